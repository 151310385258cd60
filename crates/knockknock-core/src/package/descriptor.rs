use crate::error::{Error, Result};
use knockknock_util::path::join_normalized;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the package manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// Minimal description of an installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Installation directory (the directory holding `package.json`).
    pub directory: PathBuf,
    /// Absolute path of the declared `main` entry, if any.
    pub main: Option<PathBuf>,
    pub name: String,
    pub version: String,
}

/// The subset of `package.json` knockknock reads.
///
/// Fields of the wrong type are treated as missing rather than failing the
/// whole manifest.
#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default, deserialize_with = "string_or_empty")]
    name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    version: String,
    #[serde(default, deserialize_with = "string_or_none")]
    main: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn string_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_none(deserializer).map(Option::unwrap_or_default)
}

impl PackageDescriptor {
    fn from_manifest_source(dir: &Path, manifest_path: &Path, source: &str) -> Result<Self> {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        let manifest: Manifest =
            serde_json::from_str(source).map_err(|source| Error::ManifestParse {
                path: manifest_path.to_path_buf(),
                source,
            })?;

        let main = manifest
            .main
            .filter(|m| !m.is_empty())
            .map(|m| join_normalized(dir, &m));

        Ok(Self {
            directory: dir.to_path_buf(),
            main,
            name: manifest.name,
            version: manifest.version,
        })
    }
}

/// Read the descriptor for the package installed in `dir`.
///
/// # Errors
/// Returns an error if `dir/package.json` cannot be read or is not valid JSON
/// of the expected shape.
pub fn read_manifest(dir: &Path) -> Result<PackageDescriptor> {
    debug!(dir = %dir.display(), "Reading package manifest");

    let manifest_path = dir.join(MANIFEST_FILE);
    let source = std::fs::read_to_string(&manifest_path).map_err(|source| Error::ManifestRead {
        path: manifest_path.clone(),
        source,
    })?;

    PackageDescriptor::from_manifest_source(dir, &manifest_path, &source)
}

/// Async variant of [`read_manifest`].
pub async fn read_manifest_async(dir: &Path) -> Result<PackageDescriptor> {
    debug!(dir = %dir.display(), "Reading package manifest");

    let manifest_path = dir.join(MANIFEST_FILE);
    let source = tokio::fs::read_to_string(&manifest_path)
        .await
        .map_err(|source| Error::ManifestRead {
            path: manifest_path.clone(),
            source,
        })?;

    PackageDescriptor::from_manifest_source(dir, &manifest_path, &source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_manifest_full() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"name": "nested", "version": "3.0.1", "main": "./src/nested.js", "license": "MIT"}"#,
        )
        .unwrap();

        let descriptor = read_manifest(dir.path()).unwrap();
        assert_eq!(descriptor.directory, dir.path());
        assert_eq!(descriptor.name, "nested");
        assert_eq!(descriptor.version, "3.0.1");
        assert_eq!(
            descriptor.main,
            Some(dir.path().join("src").join("nested.js"))
        );
    }

    #[test]
    fn test_read_manifest_without_main() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"name": "flat", "version": "1.0.0"}"#,
        )
        .unwrap();

        let descriptor = read_manifest(dir.path()).unwrap();
        assert!(descriptor.main.is_none());
    }

    #[test]
    fn test_read_manifest_empty_main_is_absent() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"name": "flat", "version": "1.0.0", "main": ""}"#,
        )
        .unwrap();

        assert!(read_manifest(dir.path()).unwrap().main.is_none());
    }

    #[test]
    fn test_read_manifest_missing_fields_default_empty() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{}").unwrap();

        let descriptor = read_manifest(dir.path()).unwrap();
        assert_eq!(descriptor.name, "");
        assert_eq!(descriptor.version, "");
    }

    #[test]
    fn test_read_manifest_with_bom() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            "\u{feff}{\"name\": \"bom\", \"version\": \"1.0.0\"}",
        )
        .unwrap();

        let descriptor = read_manifest(dir.path()).unwrap();
        assert_eq!(descriptor.name, "bom");
        assert_eq!(descriptor.version, "1.0.0");
    }

    #[test]
    fn test_read_manifest_non_string_fields() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"name": null, "version": 2, "main": ["index.js"]}"#,
        )
        .unwrap();

        let descriptor = read_manifest(dir.path()).unwrap();
        assert_eq!(descriptor.name, "");
        assert_eq!(descriptor.version, "");
        assert!(descriptor.main.is_none());
    }

    #[test]
    fn test_read_manifest_malformed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{ not json").unwrap();

        let err = read_manifest(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ManifestParse { .. }));
        assert!(err.to_string().contains(MANIFEST_FILE));
    }

    #[test]
    fn test_read_manifest_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_manifest(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ManifestRead { .. }));
    }

    #[tokio::test]
    async fn test_read_manifest_async_matches_sync() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"name": "bar", "version": "3.2.1", "main": "src/bar.js"}"#,
        )
        .unwrap();

        let sync = read_manifest(dir.path()).unwrap();
        let async_read = read_manifest_async(dir.path()).await.unwrap();
        assert_eq!(sync, async_read);
    }

    #[tokio::test]
    async fn test_read_manifest_async_lenient() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            "\u{feff}{\"name\": null, \"version\": \"0.1.0\", \"main\": false}",
        )
        .unwrap();

        let descriptor = read_manifest_async(dir.path()).await.unwrap();
        assert_eq!(descriptor.name, "");
        assert_eq!(descriptor.version, "0.1.0");
        assert!(descriptor.main.is_none());
        assert_eq!(descriptor, read_manifest(dir.path()).unwrap());
    }

    #[tokio::test]
    async fn test_read_manifest_async_malformed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "[1, 2").unwrap();

        let err = read_manifest_async(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::ManifestParse { .. }));
    }
}
