#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]

mod commands;
mod logging;

use clap::Parser;
use knockknock_core::Config;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "knockknock")]
#[command(author, version, about = "Find out which package called you", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    /// Script hosting the lookup; its frames are always skipped
    #[arg(long, global = true, value_name = "PATH", env = "KNOCKKNOCK_MODULE_PATH")]
    module_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Attribute a V8 stack trace to the packages that made each call
    ///
    /// The first three frames are treated as the lookup machinery and are
    /// never reported.
    Callers {
        /// File containing `Error.stack` text (reads stdin when omitted)
        #[arg(long, value_name = "FILE")]
        stack: Option<PathBuf>,

        /// Package names whose calls are skipped (repeatable)
        #[arg(long = "exclude", value_name = "NAME")]
        excludes: Vec<String>,

        /// Maximum number of callers (negative values mean 0)
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Number of callers to skip (negative values mean 0)
        #[arg(long, allow_negative_numbers = true)]
        offset: Option<i64>,

        /// Skip callers whose file is not inside any package
        #[arg(long)]
        only_packaged: bool,

        /// Resolve packages with async filesystem calls
        #[arg(long = "async")]
        use_async: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = cli
        .cwd
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let config = Config::new(cwd)
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json)
        .with_module_path(cli.module_path.clone());

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(cli.json),
        Some(Commands::Callers {
            stack,
            excludes,
            limit,
            offset,
            only_packaged,
            use_async,
        }) => {
            let span = tracing::info_span!("callers", cmd = "callers", cwd = %config.cwd.display());
            let _guard = span.enter();

            let action = commands::callers::CallersAction {
                stack,
                excludes,
                limit,
                offset,
                only_packaged,
                use_async,
            };
            commands::callers::run(action, &config)
        }
    }
}
