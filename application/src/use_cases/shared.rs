//! Shared utilities for use cases.
//!
//! Cancellation checks and timeout wrapping for capability calls.

use crate::ports::turn_generator::GenerationError;
use dialectic_domain::DomainError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(DomainError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), DomainError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(DomainError::Cancelled);
    }
    Ok(())
}

/// Await a capability call, failing with [`GenerationError::Timeout`] when
/// a limit is configured and exceeded.
pub(crate) async fn with_timeout<F, T>(
    timeout: Option<Duration>,
    call: F,
) -> Result<T, GenerationError>
where
    F: Future<Output = Result<T, GenerationError>>,
{
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(limit.as_secs())),
        },
        None => call.await,
    }
}
