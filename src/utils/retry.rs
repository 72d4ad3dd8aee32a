//! Retry with exponential backoff for transient API failures.

use std::time::Duration;
use tokio::time::sleep;

use crate::arxiv::ArxivError;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

/// Retry configuration tuned for the arXiv API, which rate limits
/// aggressively under load
pub fn api_retry_config() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        initial_delay: Duration::from_secs(1),
        max_delay: Duration::from_secs(30),
        backoff_multiplier: 2.0,
    }
}

/// Whether an error is worth retrying. Invalid requests and parse errors
/// are permanent; network failures and server-side statuses are not.
fn is_transient(err: &ArxivError) -> bool {
    match err {
        ArxivError::Network(_) => true,
        ArxivError::Api(msg) => {
            msg.contains("429") || msg.contains("502") || msg.contains("503") || msg.contains("504")
        }
        _ => false,
    }
}

/// Execute an async operation, retrying transient failures with
/// exponential backoff
pub async fn with_retry<T, F, Fut>(config: RetryConfig, mut operation: F) -> Result<T, ArxivError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, ArxivError>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!(attempt, "operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(error) if is_transient(&error) && attempt < config.max_attempts => {
                let exp_delay = config.initial_delay.as_secs_f64()
                    * config.backoff_multiplier.powi(attempt as i32 - 1);
                let delay =
                    Duration::from_secs_f64(exp_delay.min(config.max_delay.as_secs_f64()));

                tracing::debug!(attempt, ?delay, %error, "transient error, retrying");
                sleep(delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn fast_config() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
            backoff_multiplier: 2.0,
        }
    }

    #[tokio::test]
    async fn test_success_first_try() {
        let calls = Rc::new(RefCell::new(0));

        let result = {
            let calls = calls.clone();
            with_retry(fast_config(), move || {
                let calls = calls.clone();
                async move {
                    *calls.borrow_mut() += 1;
                    Ok("success")
                }
            })
        }
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(*calls.borrow(), 1);
    }

    #[tokio::test]
    async fn test_retries_transient_errors() {
        let calls = Rc::new(RefCell::new(0));

        let result = {
            let calls = calls.clone();
            with_retry(fast_config(), move || {
                let calls = calls.clone();
                async move {
                    *calls.borrow_mut() += 1;
                    if *calls.borrow() < 3 {
                        Err(ArxivError::Network("connection reset".to_string()))
                    } else {
                        Ok("success")
                    }
                }
            })
        }
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(*calls.borrow(), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_not_retried() {
        let calls = Rc::new(RefCell::new(0));

        let result: Result<(), ArxivError> = {
            let calls = calls.clone();
            with_retry(fast_config(), move || {
                let calls = calls.clone();
                async move {
                    *calls.borrow_mut() += 1;
                    Err(ArxivError::InvalidRequest("bad input".to_string()))
                }
            })
        }
        .await;

        assert!(matches!(result, Err(ArxivError::InvalidRequest(_))));
        assert_eq!(*calls.borrow(), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Rc::new(RefCell::new(0));

        let result: Result<(), ArxivError> = {
            let calls = calls.clone();
            with_retry(fast_config(), move || {
                let calls = calls.clone();
                async move {
                    *calls.borrow_mut() += 1;
                    Err(ArxivError::Api("arXiv API returned status 503".to_string()))
                }
            })
        }
        .await;

        assert!(matches!(result, Err(ArxivError::Api(_))));
        assert_eq!(*calls.borrow(), 3);
    }

    #[test]
    fn test_transient_classification() {
        assert!(is_transient(&ArxivError::Network("timeout".to_string())));
        assert!(is_transient(&ArxivError::Api("status 503".to_string())));
        assert!(!is_transient(&ArxivError::Api("status 404".to_string())));
        assert!(!is_transient(&ArxivError::Parse("bad xml".to_string())));
        assert!(!is_transient(&ArxivError::InvalidRequest("x".to_string())));
    }
}
