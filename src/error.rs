//! Error types for object fetch operations

use thiserror::Error;

use crate::location::ObjectLocation;

/// Boxed cause carried by errors that wrap a backend failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Error taxonomy for resolving and fetching a single object
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URI could not be split into bucket and key
    #[error("Malformed URI '{uri}': {reason}")]
    MalformedUri { uri: String, reason: String },

    /// The client session could not be established
    #[error("Unable to create storage session: {message}")]
    Session {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The remote reported that the object does not exist
    #[error("Object not found: {location}")]
    NotFound {
        location: ObjectLocation,
        #[source]
        source: Option<BoxError>,
    },

    /// The storage service rejected or could not fulfill the request
    #[error("Unable to get object {location}: {message}")]
    Remote {
        location: ObjectLocation,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The response stream could not be fully drained
    #[error("Error reading object {location}: {source}")]
    Read {
        location: ObjectLocation,
        #[source]
        source: std::io::Error,
    },

    /// The execution context was cancelled
    #[error("Fetch cancelled")]
    Cancelled,

    /// The execution context deadline elapsed
    #[error("Fetch deadline exceeded")]
    DeadlineExceeded,

    /// No fetcher is registered for the scheme
    #[error("Unsupported scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    /// Invalid configuration values
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl FetchError {
    /// Create a new malformed URI error
    pub fn malformed_uri(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedUri {
            uri: uri.into(),
            reason: reason.into(),
        }
    }

    /// Create a new session error without an underlying cause
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new session error wrapping its cause
    pub fn session_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Session {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new not found error
    pub fn not_found(location: ObjectLocation) -> Self {
        Self::NotFound {
            location,
            source: None,
        }
    }

    /// Create a new remote error wrapping its cause
    pub fn remote(
        location: ObjectLocation,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Remote {
            location,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new read error
    pub fn read(location: ObjectLocation, source: std::io::Error) -> Self {
        Self::Read { location, source }
    }

    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True for failures reported by the storage service, not-found included
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Remote { .. })
    }

    /// True when the caller's context stopped the fetch
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::MalformedUri { .. } => "validation",
            Self::Session { .. } => "session",
            Self::NotFound { .. } => "not_found",
            Self::Remote { .. } => "remote",
            Self::Read { .. } => "read",
            Self::Cancelled => "cancelled",
            Self::DeadlineExceeded => "deadline",
            Self::UnsupportedScheme { .. } => "validation",
            Self::Configuration { .. } => "configuration",
        }
    }
}
