// src/api/guard.rs
//! Rate/Error Guard: bounded retry with exponential backoff.
//!
//! Every upstream call runs through `execute_with_retry`. Transient
//! failures (throttles, transport timeouts) are retried a bounded number
//! of times with growing delays; terminal failures, plain 5xx responses
//! included, surface immediately and untouched. The backoff sleep blocks
//! only the task that incurred the failure.

use crate::constants::{RETRY_INITIAL_DELAY_MS, RETRY_MAX_ATTEMPTS, RETRY_MAX_DELAY_MS};
use crate::error::AppError;
use std::time::Duration;

/// Retry policy for upstream calls.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts per call, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Ceiling on the doubling delay.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(RETRY_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(RETRY_MAX_DELAY_MS),
        }
    }
}

/// Runs an upstream operation, retrying classified-transient failures.
///
/// Exhausted retryable failures are rewritten into their terminal forms —
/// `RateLimitExceeded` for throttles, `NetworkTimeout` for transport
/// failures — carrying the attempt count and the last upstream message.
/// Non-retryable errors pass through on the first occurrence.
pub async fn execute_with_retry<T, F, Fut>(
    mut operation: F,
    config: &RetryConfig,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, AppError>>,
{
    let mut delay = config.initial_delay;
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < config.max_attempts => {
                log::warn!(
                    "Upstream call failed (attempt {}/{}): {}. Retrying in {:?}",
                    attempt,
                    config.max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, config.max_delay);
                attempt += 1;
            }
            Err(e) if e.is_retryable() => return Err(exhausted(e, attempt)),
            Err(e) => return Err(e),
        }
    }
}

/// Rewrites a still-transient failure into its terminal form after the
/// retry budget is spent.
fn exhausted(error: AppError, attempts: u32) -> AppError {
    if error.is_rate_limited() {
        AppError::RateLimitExceeded {
            attempts,
            message: error.to_string(),
        }
    } else if let AppError::NetworkFailure(_) = error {
        AppError::NetworkTimeout {
            attempts,
            message: error.to_string(),
        }
    } else {
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphErrorCode;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn test_config() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    fn throttle_error() -> AppError {
        AppError::GraphService {
            code: GraphErrorCode::RateLimited,
            message: "(#17) User request limit reached".to_string(),
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// 429 on attempt 1, success on attempt 2: the successful result comes
    /// back, with exactly one retry and no duplicate work.
    #[tokio::test]
    async fn rate_limit_then_success_yields_result_after_one_retry() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result = execute_with_retry(
            move || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n == 1 {
                        Err(throttle_error())
                    } else {
                        Ok(42)
                    }
                }
            },
            &test_config(),
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhausted_throttle_surfaces_as_rate_limit_exceeded() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result: Result<(), _> = execute_with_retry(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(throttle_error()) }
            },
            &test_config(),
        )
        .await;

        match result {
            Err(AppError::RateLimitExceeded { attempts: n, message }) => {
                assert_eq!(n, 3);
                assert!(message.contains("User request limit reached"));
            }
            other => panic!("expected RateLimitExceeded, got {:?}", other.err()),
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    /// A plain 5xx is terminal: classification of the raw body feeds the
    /// guard, which must surface it on the first attempt, not back off.
    #[tokio::test]
    async fn http_500_surfaces_after_a_single_attempt() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result: Result<(), _> = execute_with_retry(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(crate::api::parser::parse_error_body(
                        "<html>Internal Server Error</html>",
                        reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                        "https://graph.facebook.com/v22.0/act_123/ads",
                    ))
                }
            },
            &test_config(),
        )
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(matches!(
            result,
            Err(AppError::GraphService {
                code: GraphErrorCode::ServerError,
                ..
            })
        ));
    }

    /// A fatal upstream error (expired token) is never retried.
    #[tokio::test]
    async fn fatal_errors_pass_through_without_retry() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result: Result<(), _> = execute_with_retry(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(AppError::GraphService {
                        code: GraphErrorCode::InvalidToken,
                        message: "Error validating access token".to_string(),
                        status: reqwest::StatusCode::BAD_REQUEST,
                    })
                }
            },
            &test_config(),
        )
        .await;

        assert!(matches!(
            result,
            Err(AppError::GraphService {
                code: GraphErrorCode::InvalidToken,
                ..
            })
        ));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
