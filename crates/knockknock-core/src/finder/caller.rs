use crate::package::PackageDescriptor;
use crate::stack::StackFrame;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name reported for frames whose function has no name.
pub const ANONYMOUS: &str = "<anonymous>";

/// One caller that passed every inclusion check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerRecord {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
    pub name: String,
    /// Owning package, or `None` when no ancestor directory has a manifest.
    pub package: Option<PackageDescriptor>,
}

impl CallerRecord {
    pub(crate) fn new(frame: StackFrame, package: Option<PackageDescriptor>) -> Self {
        Self {
            file: frame.file,
            line: frame.line,
            column: frame.column,
            name: frame.function.unwrap_or_else(|| ANONYMOUS.to_string()),
            package,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_anonymous_sentinel() {
        let record = CallerRecord::new(StackFrame::new("/srv/a.js", 1, 2), None);
        assert_eq!(record.name, ANONYMOUS);
    }

    #[cfg(unix)]
    #[test]
    fn test_serialized_shape() {
        let record = CallerRecord::new(
            StackFrame::new("/srv/app/src/a.js", 12, 5).with_function("run"),
            Some(PackageDescriptor {
                directory: PathBuf::from("/srv/app"),
                main: None,
                name: "app".to_string(),
                version: "1.0.0".to_string(),
            }),
        );

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "file": "/srv/app/src/a.js",
                "line": 12,
                "column": 5,
                "name": "run",
                "package": {
                    "directory": "/srv/app",
                    "main": null,
                    "name": "app",
                    "version": "1.0.0"
                }
            })
        );
    }
}
