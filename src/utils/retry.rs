//! Bounded retry for whole operations
//!
//! Generation is pure computation, so retries run back to back without
//! delay. Only errors reported as recoverable are retried.

use std::fmt::Display;
use tracing::{debug, warn};

use crate::error::TimesheetErrorTrait;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

impl RetryConfig {
    /// Create a retry configuration with a custom attempt count
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }
}

/// Run `operation` until it succeeds, fails unrecoverably, or attempts run out
///
/// The closure receives the 1-based attempt number. Returns the last error
/// when every attempt failed.
pub fn with_retry<T, E, F>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: FnMut(u32) -> Result<T, E>,
    E: TimesheetErrorTrait,
{
    with_retry_if(config, operation, |e: &E| e.is_recoverable())
}

/// Like [`with_retry`], with a custom retry predicate
pub fn with_retry_if<T, E, F, P>(
    config: &RetryConfig,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut(u32) -> Result<T, E>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt) {
            Ok(result) => {
                if attempt > 1 {
                    debug!(attempt = attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) => {
                if !should_retry(&e) {
                    warn!(error = %e, "Non-retryable error encountered");
                    return Err(e);
                }
                if attempt >= max_attempts {
                    warn!(
                        attempt = attempt,
                        max_attempts = max_attempts,
                        error = %e,
                        "Operation failed, no attempts left"
                    );
                    return Err(e);
                }

                warn!(
                    attempt = attempt,
                    max_attempts = max_attempts,
                    error = %e,
                    "Operation failed, will retry"
                );
                attempt += 1;
            }
        }
    }
}
