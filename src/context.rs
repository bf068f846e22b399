//! Cancellable, deadline-bearing execution context threaded through fetches

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{FetchError, FetchResult};

/// Handle carrying cancellation and an optional deadline.
///
/// Clones share the same cancellation state. Use [`FetchContext::child`] to
/// derive a context that is cancelled with its parent but can also be
/// cancelled on its own.
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl FetchContext {
    /// Create a context with no deadline
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context whose deadline elapses after `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Create a context with an absolute deadline
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Derive a child context sharing this context's deadline
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Derive a child context whose deadline is the earlier of the parent's and `timeout` from now
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        Self {
            token: self.token.child_token(),
            deadline: Some(match self.deadline {
                Some(existing) => existing.min(candidate),
                None => candidate,
            }),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Underlying token, for callers that already use `tokio-util`
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Fail fast if the context is already cancelled or past its deadline
    pub fn check(&self) -> FetchResult<()> {
        if self.token.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(FetchError::DeadlineExceeded);
            }
        }
        Ok(())
    }

    /// Race `future` against cancellation and the deadline.
    ///
    /// When the context wins, `future` is dropped before returning, releasing
    /// whatever it owns.
    pub async fn run<F, T>(&self, future: F) -> FetchResult<T>
    where
        F: Future<Output = FetchResult<T>>,
    {
        let deadline = self.deadline;
        let expired = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(FetchError::Cancelled),
            _ = expired => Err(FetchError::DeadlineExceeded),
            result = future => result,
        }
    }
}
