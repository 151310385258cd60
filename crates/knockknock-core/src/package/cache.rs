//! Descriptor cache.
//!
//! Maps caller file paths to the package that owns them so repeat callers
//! skip the upward directory search.

use super::descriptor::PackageDescriptor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Cached resolution for one file.
///
/// `NotFound` is a real answer: the file was searched and has no owning
/// package, so it must not be searched again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedPackage {
    Found(PackageDescriptor),
    NotFound,
}

impl CachedPackage {
    #[must_use]
    pub fn descriptor(&self) -> Option<&PackageDescriptor> {
        match self {
            Self::Found(descriptor) => Some(descriptor),
            Self::NotFound => None,
        }
    }

    #[must_use]
    pub fn into_descriptor(self) -> Option<PackageDescriptor> {
        match self {
            Self::Found(descriptor) => Some(descriptor),
            Self::NotFound => None,
        }
    }
}

impl From<Option<PackageDescriptor>> for CachedPackage {
    fn from(value: Option<PackageDescriptor>) -> Self {
        value.map_or(Self::NotFound, Self::Found)
    }
}

/// Trait for caching package resolutions by file path.
///
/// Implementations should be thread-safe (Send + Sync). `get` returns an
/// owned copy; callers never observe the stored value itself.
pub trait DescriptorCache: Send + Sync + std::fmt::Debug {
    /// Look up a file. `None` means the file has not been resolved yet.
    fn get(&self, file: &Path) -> Option<CachedPackage>;

    /// Store the resolution for a file, replacing any previous entry.
    fn set(&self, file: &Path, value: CachedPackage);

    /// Drop every entry.
    fn clear(&self);

    /// Number of cached files.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory cache shared by every lookup of a `KnockKnock` instance.
#[derive(Debug, Default)]
pub struct MemoryDescriptorCache {
    entries: RwLock<HashMap<PathBuf, CachedPackage>>,
}

impl MemoryDescriptorCache {
    /// Create a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DescriptorCache for MemoryDescriptorCache {
    fn get(&self, file: &Path) -> Option<CachedPackage> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(file).cloned()
    }

    fn set(&self, file: &Path, value: CachedPackage) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(file.to_path_buf(), value);
    }

    fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.len()
    }
}

/// No-op cache implementation (always misses, never stores).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDescriptorCache;

impl DescriptorCache for NoDescriptorCache {
    fn get(&self, _file: &Path) -> Option<CachedPackage> {
        None
    }

    fn set(&self, _file: &Path, _value: CachedPackage) {
        // No-op
    }

    fn clear(&self) {}

    fn len(&self) -> usize {
        0
    }
}
