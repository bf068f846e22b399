//! In-memory fetcher serving objects from a process-local map

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::RwLock;
use tracing::debug;

use super::traits::{ObjectBody, ObjectFetcher};
use crate::error::{FetchError, FetchResult};
use crate::location::ObjectLocation;

/// Fetcher backed by a thread-safe `(bucket, key) -> bytes` map
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    objects: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryFetcher {
    /// Create an empty memory fetcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object, replacing any previous content
    pub fn insert(
        &self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) {
        let mut objects = self.objects.write().unwrap_or_else(|e| e.into_inner());
        objects.insert((bucket.into(), key.into()), data.into());
    }

    /// Builder-style variant of [`MemoryFetcher::insert`]
    pub fn with_object(
        self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        self.insert(bucket, key, data);
        self
    }

    /// Remove an object, returning whether it existed
    pub fn remove(&self, bucket: &str, key: &str) -> bool {
        let mut objects = self.objects.write().unwrap_or_else(|e| e.into_inner());
        objects.remove(&(bucket.to_string(), key.to_string())).is_some()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectFetcher for MemoryFetcher {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn open(&self, location: &ObjectLocation) -> FetchResult<ObjectBody> {
        let data = {
            let objects = self.objects.read().unwrap_or_else(|e| e.into_inner());
            objects
                .get(&(location.bucket().to_string(), location.key().to_string()))
                .cloned()
        };

        match data {
            Some(data) => {
                debug!("Serving {} bytes from memory for {}", data.len(), location);
                Ok(Box::pin(Cursor::new(data)))
            }
            None => Err(FetchError::not_found(location.clone())),
        }
    }
}
