//! Store Deadlines
//!
//! Shared by every crate that talks to a store; each error type decides how
//! an elapsed deadline renders through `From<DeadlineElapsed>`.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// A store call outlived its limit
#[derive(Debug, Clone, Error)]
#[error("{operation} timed out after {}ms", limit.as_millis())]
pub struct DeadlineElapsed {
    pub operation: &'static str,
    pub limit: Duration,
}

/// Run a store call under `limit`. An elapsed deadline is a transient
/// failure, never an authorization outcome.
pub async fn with_deadline<T, E, F>(limit: Duration, operation: &'static str, fut: F) -> Result<T, E>
where
    E: From<DeadlineElapsed>,
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(DeadlineElapsed { operation, limit }.into()),
    }
}
