//! Per-call deadline and bounded retry with fixed backoff.
//!
//! Only transient failures are retried; permanent errors (version conflicts,
//! guardrail violations, illegal transitions) return immediately so the
//! orchestrator can compensate.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
    pub call_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
            call_timeout: Duration::from_secs(2),
        }
    }
}

/// Run `call` under the policy's deadline, retrying transient failures up to
/// `max_attempts` with a fixed backoff between attempts.
pub async fn call_with_retries<T, F, Fut>(
    policy: &RetryPolicy,
    step: &str,
    mut call: F,
) -> DomainResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let mut attempt = 1;
    loop {
        match tokio::time::timeout(policy.call_timeout, call()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(error)) if error.is_transient() && attempt < policy.max_attempts => {
                warn!(step, attempt, %error, "transient failure; retrying");
            }
            Ok(Err(error)) => return Err(error),
            Err(_elapsed) if attempt < policy.max_attempts => {
                warn!(step, attempt, "call timed out; retrying");
            }
            Err(_elapsed) => {
                return Err(DomainError::DeadlineExceeded(format!(
                    "{step} exceeded the {:?} deadline",
                    policy.call_timeout
                )));
            }
        }
        attempt += 1;
        tokio::time::sleep(policy.backoff).await;
    }
}
