use std::future::Future;
use std::time::Duration;

use crate::error::CatalogError;

/// Bounded retry with linearly increasing backoff for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_millis(1500),
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following the given attempt (1-based).
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Run a request up to `policy.max_attempts` times.
///
/// A successful response for which `is_transient` holds (e.g. a 5xx status)
/// is retried while the budget lasts and otherwise returned as-is, letting
/// the caller surface the underlying failure unchanged. Errors are retried
/// only when [`CatalogError::is_transient`]; client-side errors come back
/// immediately.
pub(crate) async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    mut request: F,
    is_transient: impl Fn(&T) -> bool,
) -> Result<T, CatalogError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CatalogError>>,
{
    let mut attempt = 1_u32;
    loop {
        match request().await {
            Ok(value) => {
                if is_transient(&value) && attempt < policy.max_attempts {
                    let delay = policy.backoff_delay(attempt);
                    log::warn!("transient catalog response, retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                return Ok(value);
            }
            Err(err) => {
                if err.is_transient() && attempt < policy.max_attempts {
                    let delay = policy.backoff_delay(attempt);
                    log::warn!("catalog request failed ({err}), retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                return Err(err);
            }
        }
    }
}
