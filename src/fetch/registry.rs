//! Scheme-based dispatch across fetcher backends

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::info;

use super::traits::ObjectFetcher;
use crate::context::FetchContext;
use crate::entry::Entry;
use crate::error::{FetchError, FetchResult};

/// Routes entries to the fetcher registered for their backend or URI scheme
#[derive(Clone, Default)]
pub struct FetcherRegistry {
    fetchers: BTreeMap<String, Arc<dyn ObjectFetcher>>,
}

impl FetcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `fetcher` for `scheme`, returning the fetcher it replaces
    pub fn register(
        &mut self,
        scheme: impl Into<String>,
        fetcher: Arc<dyn ObjectFetcher>,
    ) -> Option<Arc<dyn ObjectFetcher>> {
        self.fetchers.insert(scheme.into().to_ascii_lowercase(), fetcher)
    }

    /// Builder-style variant of [`FetcherRegistry::register`]
    pub fn with(mut self, scheme: impl Into<String>, fetcher: Arc<dyn ObjectFetcher>) -> Self {
        self.register(scheme, fetcher);
        self
    }

    /// Register an S3 session built from `config` under `s3`
    #[cfg(feature = "s3")]
    pub async fn with_s3(self, config: &crate::config::S3Config) -> FetchResult<Self> {
        let fetcher = super::s3::S3Fetcher::from_config(config).await?;
        Ok(self.with("s3", Arc::new(fetcher)))
    }

    pub fn get(&self, scheme: &str) -> Option<Arc<dyn ObjectFetcher>> {
        self.fetchers.get(&scheme.to_ascii_lowercase()).cloned()
    }

    /// Registered schemes in sorted order
    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.fetchers.keys().map(String::as_str)
    }

    /// Resolve `entry` and fetch it with the matching backend
    pub async fn fetch(&self, ctx: &FetchContext, entry: &Entry) -> FetchResult<Vec<u8>> {
        let location = entry.location()?;
        let backend = match &entry.backend {
            Some(backend) => backend.to_ascii_lowercase(),
            None => location.scheme().to_string(),
        };
        let fetcher = self
            .get(&backend)
            .ok_or(FetchError::UnsupportedScheme { scheme: backend })?;

        info!("Fetching index '{}' from {}", entry.name, location);
        fetcher.fetch(ctx, &location).await
    }
}

impl fmt::Debug for FetcherRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.fetchers.iter().map(|(scheme, fetcher)| (scheme, fetcher.name())))
            .finish()
    }
}
