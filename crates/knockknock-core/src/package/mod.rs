//! Package descriptors: resolution from `package.json` and caching.

mod cache;
mod descriptor;
mod resolver;

pub use cache::{CachedPackage, DescriptorCache, MemoryDescriptorCache, NoDescriptorCache};
pub use descriptor::{read_manifest, read_manifest_async, PackageDescriptor, MANIFEST_FILE};
pub use resolver::{resolve, resolve_async};
