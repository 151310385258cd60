//! Path helpers for locations reported by JavaScript stack frames.

use std::path::{Component, Path, PathBuf};
use url::Url;

/// Join `relative` onto `base` and fold away `.` and `..` components lexically.
///
/// `relative` is always taken relative to `base`, even when it carries a
/// leading separator. No filesystem access is made, so symlinks are not
/// resolved. A `..` that would climb above the root of `base` is dropped.
#[must_use]
pub fn join_normalized(base: &Path, relative: &str) -> PathBuf {
    let relative = relative.trim_start_matches(['/', '\\']);
    let mut out = PathBuf::new();

    for component in base.join(relative).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    out
}

/// Convert a `file://` URL into a filesystem path.
///
/// Returns `None` for anything that is not a well-formed `file:` URL, so
/// callers can fall back to treating the input as a plain path.
#[must_use]
pub fn file_url_to_path(location: &str) -> Option<PathBuf> {
    if !location.starts_with("file:") {
        return None;
    }

    Url::parse(location).ok()?.to_file_path().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_file_url_to_path_unix() {
        assert_eq!(
            file_url_to_path("file:///srv/app/src/index.mjs"),
            Some(PathBuf::from("/srv/app/src/index.mjs"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_file_url_percent_decoding() {
        assert_eq!(
            file_url_to_path("file:///srv/my%20app/a.js"),
            Some(PathBuf::from("/srv/my app/a.js"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_join_normalized_strips_dot_segments() {
        let base = Path::new("/srv/app/node_modules/foo");
        assert_eq!(
            join_normalized(base, "./src/index.js"),
            PathBuf::from("/srv/app/node_modules/foo/src/index.js")
        );
        assert_eq!(
            join_normalized(base, "lib/../dist/main.js"),
            PathBuf::from("/srv/app/node_modules/foo/dist/main.js")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_join_normalized_stops_at_root() {
        assert_eq!(
            join_normalized(Path::new("/a"), "../../b.js"),
            PathBuf::from("/b.js")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_join_normalized_keeps_leading_separator_under_base() {
        assert_eq!(
            join_normalized(Path::new("/a"), "/etc/entry.js"),
            PathBuf::from("/a/etc/entry.js")
        );
    }

    #[test]
    fn test_non_file_urls_rejected() {
        assert!(file_url_to_path("node:internal/modules/cjs/loader").is_none());
        assert!(file_url_to_path("https://example.com/a.js").is_none());
        assert!(file_url_to_path("/plain/path.js").is_none());
    }
}
