//! Object fetcher backends

pub mod registry;
pub mod traits;

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "filesystem")]
pub mod filesystem;

#[cfg(feature = "s3")]
pub mod s3;

pub use registry::FetcherRegistry;
pub use traits::{ObjectBody, ObjectFetcher, drain, fetch_entry, fetch_object};

#[cfg(feature = "memory")]
pub use memory::MemoryFetcher;

#[cfg(feature = "filesystem")]
pub use filesystem::FileSystemFetcher;

#[cfg(feature = "s3")]
pub use s3::S3Fetcher;
