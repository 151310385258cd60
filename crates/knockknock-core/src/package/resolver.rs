use super::descriptor::{read_manifest, read_manifest_async, PackageDescriptor, MANIFEST_FILE};
use crate::error::Result;
use knockknock_util::fs::{find_up, find_up_async};
use std::path::Path;
use tracing::debug;

fn search_start(file: &Path) -> &Path {
    file.parent().unwrap_or(file)
}

/// Resolve the package that owns `file`.
///
/// Searches upward from the directory containing `file` for the nearest
/// `package.json`. Returns `Ok(None)` when no ancestor has one.
///
/// # Errors
/// Returns an error if the nearest manifest exists but cannot be read or parsed.
pub fn resolve(file: &Path) -> Result<Option<PackageDescriptor>> {
    debug!(file = %file.display(), "Finding installation directory for package containing file");

    match find_up(search_start(file), MANIFEST_FILE) {
        Some(dir) => read_manifest(&dir).map(Some),
        None => Ok(None),
    }
}

/// Async variant of [`resolve`].
pub async fn resolve_async(file: &Path) -> Result<Option<PackageDescriptor>> {
    debug!(file = %file.display(), "Finding installation directory for package containing file");

    match find_up_async(search_start(file), MANIFEST_FILE).await {
        Some(dir) => read_manifest_async(&dir).await.map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;
    use tempfile::tempdir;

    fn write_pkg(dir: &Path, json: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE), json).unwrap();
    }

    #[test]
    fn test_resolve_nearest_package() {
        let root = tempdir().unwrap();
        let app = root.path().join("app");
        let bar = app.join("node_modules").join("foo").join("node_modules").join("bar");
        write_pkg(&app, r#"{"name": "app", "version": "1.0.0"}"#);
        write_pkg(&bar, r#"{"name": "bar", "version": "3.2.1", "main": "src/bar.js"}"#);
        fs::create_dir_all(bar.join("src")).unwrap();

        let descriptor = resolve(&bar.join("src").join("bar.js")).unwrap().unwrap();
        assert_eq!(descriptor.name, "bar");
        assert_eq!(descriptor.directory, bar);
        assert_eq!(descriptor.main, Some(bar.join("src").join("bar.js")));

        // foo has no manifest of its own, so its files belong to app
        let descriptor = resolve(&app.join("node_modules").join("foo").join("index.js"))
            .unwrap()
            .unwrap();
        assert_eq!(descriptor.name, "app");
    }

    #[test]
    fn test_resolve_propagates_malformed_manifest() {
        let root = tempdir().unwrap();
        write_pkg(root.path(), "{ broken");

        let err = resolve(&root.path().join("index.js")).unwrap_err();
        assert!(matches!(err, Error::ManifestParse { .. }));
    }

    #[tokio::test]
    async fn test_resolve_async_matches_sync() {
        let root = tempdir().unwrap();
        let pkg = root.path().join("single");
        write_pkg(&pkg, r#"{"name": "single", "version": "0.1.0", "main": "index.js"}"#);
        let file = pkg.join("lib").join("single.js");

        let sync = resolve(&file).unwrap();
        let async_resolved = resolve_async(&file).await.unwrap();
        assert_eq!(sync, async_resolved);
        assert_eq!(async_resolved.unwrap().name, "single");
    }

    #[tokio::test]
    async fn test_resolve_async_propagates_malformed_manifest() {
        let root = tempdir().unwrap();
        write_pkg(root.path(), "not json at all");

        let err = resolve_async(&root.path().join("a.js")).await.unwrap_err();
        assert!(matches!(err, Error::ManifestParse { .. }));
    }
}
