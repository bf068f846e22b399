//! Caller-supplied description of where an index lives

use serde::{Deserialize, Serialize};

use crate::error::FetchResult;
use crate::location::ObjectLocation;

/// A configured index source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Human-readable name of the index
    pub name: String,
    /// URI of the remote object, e.g. `s3://bucket/index.yaml`
    pub url: String,
    /// Backend override; when absent the URI scheme selects the fetcher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

impl Entry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            backend: None,
        }
    }

    /// Set an explicit backend
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    /// Resolve the entry's URI
    pub fn location(&self) -> FetchResult<ObjectLocation> {
        ObjectLocation::parse(&self.url)
    }

    /// Backend name used for dispatch, lowercased
    pub fn backend_name(&self) -> FetchResult<String> {
        match &self.backend {
            Some(backend) => Ok(backend.to_ascii_lowercase()),
            None => Ok(self.location()?.scheme().to_string()),
        }
    }
}
