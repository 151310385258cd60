use std::path::PathBuf;
use thiserror::Error;

/// Core error type for knockknock lookups.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read package manifest at {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse package manifest at {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid stack frame on line {line}: {reason}")]
    StackParse { line: usize, reason: String },
}

impl Error {
    #[must_use]
    pub fn stack_parse(line: usize, reason: impl Into<String>) -> Self {
        Self::StackParse {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
