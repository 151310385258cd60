//! Version reporting for `knockknock version`.

use std::fmt::Write;

/// Crate version shared by the library and the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build hash stamped in by release builds through `KNOCKKNOCK_BUILD_GIT_HASH`.
const BUILD_HASH: Option<&str> = option_env!("KNOCKKNOCK_BUILD_GIT_HASH");

/// `knockknock <version>`, followed by ` (<hash>)` for stamped builds.
#[must_use]
pub fn version_string() -> String {
    format_version(VERSION, BUILD_HASH)
}

fn format_version(version: &str, hash: Option<&str>) -> String {
    let mut line = format!("knockknock {version}");
    if let Some(hash) = hash.filter(|h| !h.is_empty()) {
        let _ = write!(line, " ({hash})");
    }
    line
}
