//! Caller lookup.
//!
//! [`KnockKnock`] captures the call stack at the point of invocation and walks
//! it to find who called the hosting module. Package resolutions are cached
//! in a [`DescriptorCache`] shared by every lookup made through the same
//! instance (and its clones).

mod caller;
mod classify;
mod options;
pub mod policy;
pub mod walker;

pub use caller::{CallerRecord, ANONYMOUS};
pub use classify::FrameClassifier;
pub use options::{FileFilter, Options, PackageFilter, ParsedOptions, SELF_PACKAGE};
pub use walker::{Step, WalkState, Walker, SKIPPED_FRAMES};

use crate::config::Config;
use crate::error::Result;
use crate::package::{resolve, resolve_async, DescriptorCache, MemoryDescriptorCache};
use crate::stack::CallSites;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

/// Finds the callers of the hosting module.
#[derive(Debug, Clone)]
pub struct KnockKnock {
    call_sites: Arc<dyn CallSites>,
    cache: Arc<dyn DescriptorCache>,
    classifier: FrameClassifier,
}

impl KnockKnock {
    /// Create a finder over `call_sites` with a fresh in-memory cache.
    #[must_use]
    pub fn new(call_sites: Arc<dyn CallSites>) -> Self {
        Self {
            call_sites,
            cache: Arc::new(MemoryDescriptorCache::new()),
            classifier: FrameClassifier::default(),
        }
    }

    /// Create a finder using the module path from `config`.
    #[must_use]
    pub fn from_config(config: &Config, call_sites: Arc<dyn CallSites>) -> Self {
        Self::new(call_sites).with_module_path(config.module_path.clone())
    }

    /// Share an existing cache, e.g. one owned by a longer-lived host.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn DescriptorCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Treat frames from `path` as internal.
    #[must_use]
    pub fn with_module_path(mut self, path: Option<PathBuf>) -> Self {
        self.classifier = FrameClassifier::new(path);
        self
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<dyn DescriptorCache> {
        &self.cache
    }

    /// Drop every cached package resolution.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn walker(&self, options: &Options) -> Walker {
        Walker::new(
            self.call_sites.capture(),
            options.parse(),
            self.classifier.clone(),
            Arc::clone(&self.cache),
        )
    }

    /// Find callers, resolving packages with blocking filesystem calls.
    ///
    /// # Errors
    /// Returns an error if a caller's nearest `package.json` cannot be read or
    /// parsed. The walk stops at the first such failure.
    pub fn lookup_sync(&self, options: &Options) -> Result<Vec<CallerRecord>> {
        drive_sync(self.walker(options))
    }

    /// Find callers, resolving packages with `tokio::fs`.
    ///
    /// The stack is captured when this method is called, not when the
    /// returned future is first polled. Frames are still processed strictly
    /// in stack order.
    pub fn lookup(
        &self,
        options: &Options,
    ) -> impl Future<Output = Result<Vec<CallerRecord>>> + Send + 'static {
        drive_async(self.walker(options))
    }

    /// Nearest caller only, blocking.
    pub fn first_sync(&self, options: &Options) -> Result<Option<CallerRecord>> {
        let records = self.lookup_sync(&options.clone().limit_at_most(1))?;
        Ok(records.into_iter().next())
    }

    /// Nearest caller only.
    pub fn first(
        &self,
        options: &Options,
    ) -> impl Future<Output = Result<Option<CallerRecord>>> + Send + 'static {
        let lookup = self.lookup(&options.clone().limit_at_most(1));
        async move { lookup.await.map(|records| records.into_iter().next()) }
    }
}

fn drive_sync(mut walker: Walker) -> Result<Vec<CallerRecord>> {
    while let Step::Resolve(file) = walker.advance() {
        let package = resolve(&file)?;
        walker.provide(package);
    }

    Ok(walker.finish())
}

async fn drive_async(mut walker: Walker) -> Result<Vec<CallerRecord>> {
    while let Step::Resolve(file) = walker.advance() {
        let package = resolve_async(&file).await?;
        walker.provide(package);
    }

    Ok(walker.finish())
}
