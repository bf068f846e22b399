//! # Index Fetch
//!
//! Retrieve a single index object from object storage and hand its raw bytes
//! to the caller.
//!
//! ## Features
//!
//! - **URI resolution**: `scheme://bucket/key` into an [`ObjectLocation`]
//! - **Pluggable backends**: S3 (and S3-compatible services), local filesystem, in-memory
//! - **Cancellation**: every fetch runs under a [`FetchContext`] with optional deadline
//! - **Dispatch**: [`FetcherRegistry`] routes configured [`Entry`] values by scheme
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use index_fetch::*;
//! use std::time::Duration;
//!
//! # async fn example() -> FetchResult<()> {
//! let fetcher = S3Fetcher::from_config(&S3Config::default()).await?;
//! let ctx = FetchContext::with_timeout(Duration::from_secs(30));
//! let entry = Entry::new("falcosecurity", "s3://falco-index/index.yaml");
//!
//! let bytes = fetch_entry(&fetcher, &ctx, &entry).await?;
//! println!("fetched {} bytes", bytes.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod entry;
pub mod error;
pub mod fetch;
pub mod location;

pub use config::S3Config;
pub use context::FetchContext;
pub use entry::Entry;
pub use error::{BoxError, FetchError, FetchResult};
pub use fetch::{FetcherRegistry, ObjectBody, ObjectFetcher, fetch_entry, fetch_object};
pub use location::ObjectLocation;

#[cfg(feature = "memory")]
pub use fetch::MemoryFetcher;

#[cfg(feature = "filesystem")]
pub use fetch::FileSystemFetcher;

#[cfg(feature = "s3")]
pub use fetch::S3Fetcher;
