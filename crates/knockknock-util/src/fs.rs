use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Read a file to string, replacing invalid UTF-8 sequences with the replacement character.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_to_string_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Find the nearest directory at or above `start` that contains a file named `name`.
///
/// Returns the containing directory (not the file itself), or `None` once the
/// filesystem root has been checked without a match.
#[must_use]
pub fn find_up(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(name).is_file() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Async variant of [`find_up`] backed by `tokio::fs`.
///
/// Each probe is awaited in turn, so directories are checked in the same
/// order as the blocking variant.
pub async fn find_up_async(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if is_file_async(&current.join(name)).await {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

async fn is_file_async(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}
