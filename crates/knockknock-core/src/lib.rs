#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::return_self_not_must_use)]

//! Caller attribution for JavaScript call stacks.
//!
//! Walks a captured call stack, resolves the npm package that owns each
//! frame's file, and returns the callers that survive the exclusion and
//! filter policy, nearest first.

pub mod config;
pub mod error;
pub mod finder;
pub mod package;
pub mod stack;
pub mod version;

pub use config::Config;
pub use error::{Error, Result};
pub use finder::{CallerRecord, KnockKnock, Options, ParsedOptions, ANONYMOUS, SELF_PACKAGE};
pub use package::{
    CachedPackage, DescriptorCache, MemoryDescriptorCache, NoDescriptorCache, PackageDescriptor,
    MANIFEST_FILE,
};
pub use stack::{parse_v8_stack, CallSites, CapturedStack, StackFrame};
pub use version::VERSION;
