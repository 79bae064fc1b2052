//! Deadlines for storage operations.
//!
//! A slow or wedged database must surface as [`TournamentError::Timeout`]
//! instead of hanging the request that is waiting on it.

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::tournament::{TournamentError, TournamentResult};

/// Default deadline for a single read or write (5 seconds)
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default deadline for a read-modify-write transaction (10 seconds)
pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Run a storage operation under a deadline.
///
/// Errors produced by the operation itself pass through unchanged.
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> TournamentResult<T>
where
    F: Future<Output = TournamentResult<T>>,
{
    match timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => {
            log::warn!("Storage operation exceeded {duration:?}");
            Err(TournamentError::Timeout(duration))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let result = with_timeout(Duration::from_millis(100), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let result: TournamentResult<()> = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        })
        .await;

        assert!(matches!(
            result,
            Err(TournamentError::Timeout(d)) if d == Duration::from_millis(10)
        ));
    }

    #[tokio::test]
    async fn test_operation_error_passes_through() {
        let result: TournamentResult<()> = with_timeout(DEFAULT_QUERY_TIMEOUT, async {
            Err(TournamentError::TournamentNotFound("t1".to_string()))
        })
        .await;

        assert!(matches!(result, Err(TournamentError::TournamentNotFound(_))));
    }
}
