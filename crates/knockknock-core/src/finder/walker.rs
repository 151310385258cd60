//! Stack walker.
//!
//! The walker owns the cursor over a captured stack and every decision made
//! about a frame, but performs no I/O. When a frame's file is not in the
//! descriptor cache, [`Walker::advance`] returns [`Step::Resolve`]; the driver
//! resolves the package (blocking or awaited) and hands the answer back with
//! [`Walker::provide`]. Both lookup modes therefore run the same state machine.

use super::caller::CallerRecord;
use super::classify::FrameClassifier;
use super::options::ParsedOptions;
use super::policy::{include_file, include_package};
use crate::package::{CachedPackage, DescriptorCache, PackageDescriptor};
use crate::stack::StackFrame;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, trace};

/// Frames dropped from the top of every captured stack. They belong to the
/// capture machinery and the module that asked who called it.
pub const SKIPPED_FRAMES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    /// Frames remain and the limit has not been reached.
    Ready,
    /// No frames remain or the limit has been reached.
    Draining,
    /// Records have been handed out.
    Done,
}

/// What the driver must do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Resolve the package owning this file and pass it to [`Walker::provide`].
    Resolve(PathBuf),
    /// Nothing left to do; collect the result with [`Walker::finish`].
    Done,
}

#[derive(Debug)]
pub struct Walker {
    frames: VecDeque<StackFrame>,
    options: ParsedOptions,
    classifier: FrameClassifier,
    cache: Arc<dyn DescriptorCache>,
    /// Frame waiting on a resolution from the driver.
    pending: Option<StackFrame>,
    /// Callers accepted so far, including those consumed by `offset`.
    accepted: usize,
    records: Vec<CallerRecord>,
    state: WalkState,
}

impl Walker {
    /// Start a walk over `frames`, dropping the first [`SKIPPED_FRAMES`].
    #[must_use]
    pub fn new(
        frames: Vec<StackFrame>,
        options: ParsedOptions,
        classifier: FrameClassifier,
        cache: Arc<dyn DescriptorCache>,
    ) -> Self {
        Self {
            frames: frames.into_iter().skip(SKIPPED_FRAMES).collect(),
            options,
            classifier,
            cache,
            pending: None,
            accepted: 0,
            records: Vec::new(),
            state: WalkState::Ready,
        }
    }

    #[must_use]
    pub fn state(&self) -> WalkState {
        self.state
    }

    fn limit_reached(&self) -> bool {
        self.options
            .limit
            .is_some_and(|limit| self.records.len() >= limit)
    }

    /// Run until a resolution is needed or the walk is over.
    ///
    /// Skipped frames are handled inside this loop, so deep stacks of
    /// internal or rejected frames do not grow the call depth.
    pub fn advance(&mut self) -> Step {
        debug_assert!(self.pending.is_none(), "advance called with a pending frame");

        loop {
            if self.state != WalkState::Ready {
                return Step::Done;
            }

            if self.limit_reached() {
                trace!(limit = ?self.options.limit, "Caller limit reached");
                self.state = WalkState::Draining;
                continue;
            }

            let Some(frame) = self.frames.pop_front() else {
                debug!(found = self.records.len(), "Call stack exhausted");
                self.state = WalkState::Draining;
                continue;
            };

            if self.classifier.is_internal(&frame.file) {
                debug!(file = %frame.file.display(), "Skipping call from internal file");
                continue;
            }

            match self.cache.get(&frame.file) {
                Some(cached) => {
                    trace!(file = %frame.file.display(), "Package cache hit");
                    self.consider(frame, cached.into_descriptor());
                }
                None => {
                    let file = frame.file.clone();
                    self.pending = Some(frame);
                    return Step::Resolve(file);
                }
            }
        }
    }

    /// Supply the resolution requested by the last [`Step::Resolve`].
    ///
    /// The answer is cached before the frame is evaluated, including when no
    /// package was found.
    pub fn provide(&mut self, package: Option<PackageDescriptor>) {
        let Some(frame) = self.pending.take() else {
            return;
        };

        self.cache.set(&frame.file, CachedPackage::from(package.clone()));
        self.consider(frame, package);
    }

    fn consider(&mut self, frame: StackFrame, package: Option<PackageDescriptor>) {
        match &package {
            Some(descriptor) => debug!(
                package = %descriptor.name,
                file = %frame.file.display(),
                "Found package containing file"
            ),
            None => debug!(file = %frame.file.display(), "Unable to find package containing file"),
        }

        if !include_package(package.as_ref(), &self.options) {
            return;
        }

        if !include_file(&frame.file, &self.options) {
            debug!(file = %frame.file.display(), "Skipping call from filtered file");
            return;
        }

        self.accepted += 1;
        if self.accepted <= self.options.offset {
            trace!(file = %frame.file.display(), "Caller consumed by offset");
            return;
        }

        self.records.push(CallerRecord::new(frame, package));
    }

    /// Hand out the accumulated records. Further calls return an empty list.
    pub fn finish(&mut self) -> Vec<CallerRecord> {
        self.state = WalkState::Done;
        std::mem::take(&mut self.records)
    }
}
