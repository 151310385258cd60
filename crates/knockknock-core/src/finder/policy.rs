//! Inclusion policy for resolved callers.

use super::options::ParsedOptions;
use crate::package::PackageDescriptor;
use std::path::Path;
use tracing::debug;

/// Whether a caller's file passes `filter_files`.
#[must_use]
pub fn include_file(file: &Path, options: &ParsedOptions) -> bool {
    match &options.filter_files {
        Some(filter) => filter(file),
        None => true,
    }
}

/// Whether a caller's package passes the exclude list and `filter_packages`.
///
/// Excluded names are rejected before the filter runs, so the filter never
/// sees them. The filter gets its own copy of the descriptor.
#[must_use]
pub fn include_package(package: Option<&PackageDescriptor>, options: &ParsedOptions) -> bool {
    if let Some(descriptor) = package {
        if options.is_excluded(&descriptor.name) {
            debug!(package = %descriptor.name, "Skipping call from excluded package");
            return false;
        }
    }

    match &options.filter_packages {
        Some(filter) => filter(package.cloned()),
        None => true,
    }
}
