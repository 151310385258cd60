use std::path::{Path, PathBuf};

/// Decides which frames belong to knockknock itself or to the runtime.
#[derive(Debug, Clone, Default)]
pub struct FrameClassifier {
    module_path: Option<PathBuf>,
}

impl FrameClassifier {
    #[must_use]
    pub fn new(module_path: Option<PathBuf>) -> Self {
        Self { module_path }
    }

    /// A frame is internal if it comes from the hosting module, or if its
    /// file is not absolute. Runtime internals (`node:internal/...`,
    /// `<anonymous>`, `native`) are never reported with absolute paths.
    #[must_use]
    pub fn is_internal(&self, file: &Path) -> bool {
        self.module_path.as_deref() == Some(file) || !file.is_absolute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_and_runtime_specifiers_are_internal() {
        let classifier = FrameClassifier::default();
        assert!(classifier.is_internal(Path::new("node:internal/modules/cjs/loader")));
        assert!(classifier.is_internal(Path::new("<anonymous>")));
        assert!(classifier.is_internal(Path::new("src/index.js")));
    }

    #[cfg(unix)]
    #[test]
    fn test_module_path_is_internal() {
        let classifier = FrameClassifier::new(Some(PathBuf::from("/srv/knockknock/index.js")));
        assert!(classifier.is_internal(Path::new("/srv/knockknock/index.js")));
        assert!(!classifier.is_internal(Path::new("/srv/app/index.js")));
    }
}
