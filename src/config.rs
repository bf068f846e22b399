//! Session configuration for object-storage backends

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{FetchError, FetchResult};

/// S3 session configuration.
///
/// Every field is optional: anything left unset is resolved from the ambient
/// environment (`AWS_*` variables, shared profiles, instance metadata).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Config {
    /// S3 region
    pub region: Option<String>,
    /// Custom endpoint URL for S3-compatible services (e.g., MinIO, Garage)
    pub endpoint_url: Option<String>,
    /// Access key ID
    pub access_key_id: Option<String>,
    /// Secret access key
    pub secret_access_key: Option<String>,
    /// Session token for temporary credentials
    pub session_token: Option<String>,
    /// Enable path-style addressing (required for some S3-compatible services)
    pub path_style: bool,
    /// Resolve credentials while building the session instead of on first request
    pub verify_credentials: bool,
}

impl S3Config {
    /// Configuration for an S3-compatible endpoint with static credentials
    pub fn static_endpoint(
        endpoint_url: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            region: Some("us-east-1".to_string()),
            endpoint_url: Some(endpoint_url.into()),
            access_key_id: Some(access_key_id.into()),
            secret_access_key: Some(secret_access_key.into()),
            session_token: None,
            path_style: true,
            verify_credentials: false,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> FetchResult<()> {
        if let Some(region) = &self.region {
            if region.trim().is_empty() {
                return Err(FetchError::configuration("region must not be empty"));
            }
        }

        if let Some(endpoint) = &self.endpoint_url {
            let parsed = Url::parse(endpoint).map_err(|e| {
                FetchError::configuration(format!("invalid endpoint URL '{endpoint}': {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(FetchError::configuration(format!(
                    "endpoint URL '{endpoint}' must use http or https"
                )));
            }
        }

        match (&self.access_key_id, &self.secret_access_key) {
            (Some(_), None) => Err(FetchError::configuration(
                "access_key_id is set without secret_access_key",
            )),
            (None, Some(_)) => Err(FetchError::configuration(
                "secret_access_key is set without access_key_id",
            )),
            (None, None) if self.session_token.is_some() => Err(FetchError::configuration(
                "session_token requires static credentials",
            )),
            _ => Ok(()),
        }
    }

    /// Whether static credentials override ambient resolution
    pub fn has_static_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}
