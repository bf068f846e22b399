//! The object fetcher capability shared by all backends

use std::pin::Pin;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use crate::context::FetchContext;
use crate::entry::Entry;
use crate::error::{FetchError, FetchResult};
use crate::location::ObjectLocation;

/// Response body of a single object request.
///
/// Dropping the body releases the underlying stream or connection.
pub type ObjectBody = Pin<Box<dyn AsyncRead + Send>>;

/// Backend able to retrieve one object per call
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    /// Backend label used in logs
    fn name(&self) -> &'static str;

    /// Issue exactly one request for `location` and return its body
    async fn open(&self, location: &ObjectLocation) -> FetchResult<ObjectBody>;

    /// Retrieve the full content of `location`.
    ///
    /// Fails with [`FetchError::Cancelled`] or [`FetchError::DeadlineExceeded`]
    /// without calling [`ObjectFetcher::open`] when `ctx` is already done.
    async fn fetch(&self, ctx: &FetchContext, location: &ObjectLocation) -> FetchResult<Vec<u8>> {
        fetch_object(self, ctx, location).await
    }
}

/// Open `location` on `fetcher` and drain the body under `ctx`
#[tracing::instrument(skip_all, fields(backend = fetcher.name(), location = %location))]
pub async fn fetch_object<F>(
    fetcher: &F,
    ctx: &FetchContext,
    location: &ObjectLocation,
) -> FetchResult<Vec<u8>>
where
    F: ObjectFetcher + ?Sized,
{
    ctx.check()?;

    let result = ctx
        .run(async {
            let mut body = fetcher.open(location).await?;
            drain(&mut body, location).await
        })
        .await;

    match &result {
        Ok(bytes) => debug!("Fetched {} bytes", bytes.len()),
        Err(e) => warn!(category = e.category(), "Fetch failed: {}", e),
    }
    result
}

/// Resolve an entry's URI and fetch it with `fetcher`
pub async fn fetch_entry(
    fetcher: &dyn ObjectFetcher,
    ctx: &FetchContext,
    entry: &Entry,
) -> FetchResult<Vec<u8>> {
    let location = entry.location()?;
    fetcher.fetch(ctx, &location).await
}

/// Read a body to completion
pub async fn drain(body: &mut ObjectBody, location: &ObjectLocation) -> FetchResult<Vec<u8>> {
    let mut buffer = Vec::new();
    body.read_to_end(&mut buffer)
        .await
        .map_err(|e| FetchError::read(location.clone(), e))?;
    Ok(buffer)
}
