//! Resolution of storage-scheme URIs into bucket/key pairs
//!
//! URIs take the form `<scheme>://<bucket>/<key>`. The key is kept verbatim
//! apart from stripping extra leading separators, so object keys containing
//! `?`, `#` or percent signs round-trip unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FetchError, FetchResult};

const SCHEME_SEPARATOR: &str = "://";

/// Location of a single object within an object-storage service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectLocation {
    scheme: String,
    bucket: String,
    key: String,
}

impl ObjectLocation {
    /// Create a location from already-validated parts
    pub fn new(
        scheme: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            scheme: scheme.into().to_ascii_lowercase(),
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse a `<scheme>://<bucket>/<key>` URI
    pub fn parse(uri: &str) -> FetchResult<Self> {
        let (scheme, rest) = uri
            .split_once(SCHEME_SEPARATOR)
            .ok_or_else(|| FetchError::malformed_uri(uri, "missing '://' separator"))?;

        if !is_valid_scheme(scheme) {
            return Err(FetchError::malformed_uri(uri, format!("invalid scheme '{scheme}'")));
        }

        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));

        if bucket.is_empty() {
            return Err(FetchError::malformed_uri(uri, "missing bucket"));
        }
        if let Some(c) = bucket
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, '?' | '#' | '@'))
        {
            return Err(FetchError::malformed_uri(
                uri,
                format!("invalid character {c:?} in bucket"),
            ));
        }

        let key = key.trim_start_matches('/');
        if key.is_empty() {
            return Err(FetchError::malformed_uri(uri, "missing key"));
        }

        Ok(Self::new(scheme, bucket, key))
    }

    /// Parse a URI and require a specific scheme
    pub fn parse_with_scheme(uri: &str, expected: &str) -> FetchResult<Self> {
        let location = Self::parse(uri)?;
        if !location.scheme.eq_ignore_ascii_case(expected) {
            return Err(FetchError::malformed_uri(
                uri,
                format!("expected scheme '{expected}', got '{}'", location.scheme),
            ));
        }
        Ok(location)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.bucket, self.key)
    }
}

impl FromStr for ObjectLocation {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// RFC 3986: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
