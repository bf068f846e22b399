//! S3-compatible fetcher
//!
//! Works with AWS S3 and S3-compatible systems such as MinIO and Garage. The
//! client is injected so callers control credentials and endpoints; use
//! [`S3Fetcher::from_config`] to build one from ambient AWS settings.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{Credentials, ProvideCredentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use tracing::{debug, info};

use super::traits::{ObjectBody, ObjectFetcher};
use crate::config::S3Config;
use crate::error::{FetchError, FetchResult};
use crate::location::ObjectLocation;

const CREDENTIALS_PROVIDER_NAME: &str = "index-fetch";

/// Fetcher issuing a single `GetObject` per call
#[derive(Debug, Clone)]
pub struct S3Fetcher {
    client: Client,
}

impl S3Fetcher {
    /// Wrap a pre-configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Establish a session from `config`, falling back to the ambient environment
    pub async fn from_config(config: &S3Config) -> FetchResult<Self> {
        config
            .validate()
            .map_err(|e| FetchError::session_with_source("invalid S3 configuration", e))?;

        let sdk_config = Self::build_aws_config(config).await;

        if sdk_config.region().is_none() {
            return Err(FetchError::session(
                "no region configured and none found in the environment",
            ));
        }

        if config.verify_credentials {
            let provider = sdk_config
                .credentials_provider()
                .ok_or_else(|| FetchError::session("no credentials provider available"))?;
            provider
                .provide_credentials()
                .await
                .map_err(|e| FetchError::session_with_source("unable to resolve credentials", e))?;
            debug!("Resolved S3 credentials");
        }

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.path_style)
            .build();

        info!(
            "Created S3 session (region: {:?}, endpoint: {:?})",
            sdk_config.region().map(|r| r.to_string()),
            config.endpoint_url
        );
        Ok(Self::new(Client::from_conf(s3_config)))
    }

    /// Build AWS configuration from S3Config
    async fn build_aws_config(config: &S3Config) -> aws_config::SdkConfig {
        let mut config_builder =
            aws_config::defaults(BehaviorVersion::latest()).retry_config(RetryConfig::disabled());

        if let Some(region) = &config.region {
            config_builder = config_builder.region(Region::new(region.clone()));
        }

        if let Some(endpoint) = &config.endpoint_url {
            config_builder = config_builder.endpoint_url(endpoint);
        }

        if let (Some(access_key), Some(secret_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            let credentials = Credentials::new(
                access_key,
                secret_key,
                config.session_token.clone(),
                None,
                CREDENTIALS_PROVIDER_NAME,
            );
            config_builder = config_builder.credentials_provider(credentials);
        }

        config_builder.load().await
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl ObjectFetcher for S3Fetcher {
    fn name(&self) -> &'static str {
        "s3"
    }

    async fn open(&self, location: &ObjectLocation) -> FetchResult<ObjectBody> {
        debug!("Getting S3 object: {}", location);

        let response = self
            .client
            .get_object()
            .bucket(location.bucket())
            .key(location.key())
            .customize()
            .config_override(
                aws_sdk_s3::config::Builder::default().retry_config(RetryConfig::disabled()),
            )
            .send()
            .await
            .map_err(|e| classify_get_error(location, e))?;

        debug!(
            "S3 object {} opened (content length: {:?})",
            location, response.content_length
        );
        Ok(Box::pin(response.body.into_async_read()))
    }
}

fn classify_get_error(
    location: &ObjectLocation,
    err: SdkError<GetObjectError, HttpResponse>,
) -> FetchError {
    let no_such_key = err.as_service_error().map(|e| e.is_no_such_key()) == Some(true);
    let not_found_status = err.raw_response().map(|r| r.status().as_u16()) == Some(404);
    if no_such_key || not_found_status {
        debug!("S3 object not found: {}", location);
        return FetchError::NotFound {
            location: location.clone(),
            source: Some(Box::new(err)),
        };
    }

    let message = DisplayErrorContext(&err).to_string();
    FetchError::remote(location.clone(), message, err)
}
