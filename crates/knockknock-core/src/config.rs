use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime configuration shared by the CLI and embedders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Path of the script that hosts the lookup entry points.
    ///
    /// Frames from this file are always treated as internal.
    pub module_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
            module_path: None,
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    /// Set the module path whose frames are always skipped.
    ///
    /// Relative paths are resolved against `cwd`.
    #[must_use]
    pub fn with_module_path(mut self, path: Option<PathBuf>) -> Self {
        self.module_path = path.map(|p| if p.is_absolute() { p } else { self.cwd.join(p) });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let config = Config::new(PathBuf::from("/work"))
            .with_verbosity(2)
            .with_json_logs(true);

        assert_eq!(config.cwd, PathBuf::from("/work"));
        assert_eq!(config.verbosity, 2);
        assert!(config.json_logs);
        assert!(config.module_path.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_module_path_resolved_against_cwd() {
        let config = Config::new(PathBuf::from("/work"))
            .with_module_path(Some(PathBuf::from("lib/knock.js")));
        assert_eq!(config.module_path, Some(PathBuf::from("/work/lib/knock.js")));

        let config = Config::new(PathBuf::from("/work"))
            .with_module_path(Some(PathBuf::from("/opt/knock.js")));
        assert_eq!(config.module_path, Some(PathBuf::from("/opt/knock.js")));
    }
}
