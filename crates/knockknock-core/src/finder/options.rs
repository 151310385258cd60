use crate::package::PackageDescriptor;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Package name that is always excluded, so knockknock never reports itself.
pub const SELF_PACKAGE: &str = "knockknock";

/// Predicate over the absolute path of a caller's file.
pub type FileFilter = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Predicate over a caller's package.
///
/// Receives an owned copy of the descriptor (or `None` for files outside any
/// package), so it may modify its argument freely.
pub type PackageFilter = Arc<dyn Fn(Option<PackageDescriptor>) -> bool + Send + Sync>;

/// Lookup options as supplied by the caller.
///
/// `limit` and `offset` are kept signed here; [`Options::parse`] clamps them.
#[derive(Clone, Default)]
pub struct Options {
    excludes: Vec<String>,
    filter_files: Option<FileFilter>,
    filter_packages: Option<PackageFilter>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Always reject callers from the named package.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.excludes.push(name.into());
        self
    }

    /// Always reject callers from any of the named packages.
    pub fn excludes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn filter_files<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        self.filter_files = Some(Arc::new(filter));
        self
    }

    pub fn filter_packages<F>(mut self, filter: F) -> Self
    where
        F: Fn(Option<PackageDescriptor>) -> bool + Send + Sync + 'static,
    {
        self.filter_packages = Some(Arc::new(filter));
        self
    }

    /// Maximum number of callers to return. Negative values mean 0.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Number of accepted callers to drop before collecting. Negative values mean 0.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Cap the limit at `max`, keeping a smaller one if already set.
    pub(crate) fn limit_at_most(mut self, max: i64) -> Self {
        self.limit = Some(self.limit.map_or(max, |limit| limit.min(max)));
        self
    }

    /// Normalize into the form the walker consumes.
    #[must_use]
    pub fn parse(&self) -> ParsedOptions {
        let mut excludes = vec![SELF_PACKAGE.to_string()];
        for name in &self.excludes {
            if !excludes.contains(name) {
                excludes.push(name.clone());
            }
        }

        ParsedOptions {
            excludes,
            filter_files: self.filter_files.clone(),
            filter_packages: self.filter_packages.clone(),
            limit: self.limit.map(clamp_non_negative),
            offset: self.offset.map_or(0, clamp_non_negative),
        }
    }
}

fn clamp_non_negative(value: i64) -> usize {
    usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("excludes", &self.excludes)
            .field("filter_files", &self.filter_files.is_some())
            .field("filter_packages", &self.filter_packages.is_some())
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish()
    }
}

/// Options after normalization. Immutable for the duration of a lookup.
#[derive(Clone)]
pub struct ParsedOptions {
    /// Excluded package names in first-seen order, starting with [`SELF_PACKAGE`].
    pub excludes: Vec<String>,
    pub filter_files: Option<FileFilter>,
    pub filter_packages: Option<PackageFilter>,
    /// `None` means unbounded.
    pub limit: Option<usize>,
    pub offset: usize,
}

impl ParsedOptions {
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excludes.iter().any(|excluded| excluded == name)
    }
}

impl fmt::Debug for ParsedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedOptions")
            .field("excludes", &self.excludes)
            .field("filter_files", &self.filter_files.is_some())
            .field("filter_packages", &self.filter_packages.is_some())
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish()
    }
}
