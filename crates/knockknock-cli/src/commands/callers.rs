//! `knockknock callers` command implementation.
//!
//! Reads V8 `Error.stack` text (from a file or stdin) and prints the callers
//! it attributes to packages. The first three frames of the stack are the
//! lookup machinery and are never reported.

use knockknock_core::{CallerRecord, CapturedStack, Config, KnockKnock, Options};
use knockknock_util::fs::read_to_string_lossy;
use miette::{IntoDiagnostic, Result};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Parsed arguments for the callers command.
#[derive(Debug, Clone, Default)]
pub struct CallersAction {
    /// Stack trace file; stdin when `None`.
    pub stack: Option<PathBuf>,
    pub excludes: Vec<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Drop callers whose file has no owning package.
    pub only_packaged: bool,
    /// Resolve packages with async filesystem calls.
    pub use_async: bool,
}

impl CallersAction {
    fn options(&self) -> Options {
        let mut options = Options::new().excludes(self.excludes.iter().cloned());
        if let Some(limit) = self.limit {
            options = options.limit(limit);
        }
        if let Some(offset) = self.offset {
            options = options.offset(offset);
        }
        if self.only_packaged {
            options = options.filter_packages(|package| package.is_some());
        }
        options
    }

    fn read_stack(&self, config: &Config) -> Result<String> {
        match &self.stack {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    config.cwd.join(path)
                };
                debug!(path = %path.display(), "Reading stack trace");
                read_to_string_lossy(&path)
                    .map_err(|e| miette::miette!("Failed to read {}: {}", path.display(), e))
            }
            None => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .into_diagnostic()?;
                Ok(text)
            }
        }
    }
}

/// Run the callers command.
pub fn run(action: CallersAction, config: &Config) -> Result<()> {
    let text = action.read_stack(config)?;
    let stack = CapturedStack::parse(&text).into_diagnostic()?;
    info!(frames = stack.frames().len(), "Parsed stack trace");

    let finder = KnockKnock::from_config(config, Arc::new(stack));
    let options = action.options();

    let records = if action.use_async {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .into_diagnostic()?;
        rt.block_on(finder.lookup(&options)).into_diagnostic()?
    } else {
        finder.lookup_sync(&options).into_diagnostic()?
    };

    print_records(&records, config.json_logs);
    Ok(())
}

fn print_records(records: &[CallerRecord], json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "callers": records,
            })
        );
        return;
    }

    if records.is_empty() {
        println!("No callers found.");
        return;
    }

    for record in records {
        println!(
            "{} ({}:{}:{})",
            record.name,
            record.file.display(),
            record.line,
            record.column
        );
        match &record.package {
            Some(package) => println!("    {} @ {}", package.name, package.version),
            None => println!("    (no package)"),
        }
    }
}
