use anyhow::{anyhow, Result};
use rand::Rng;
use std::future::Future;
use tokio::time::{sleep, Duration};

use crate::logging::{self, Domain, Level};
use serde_json::json;

/// Retry configuration
#[derive(Clone, Debug)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 200,
            max_delay_ms: 5000,
            jitter_factor: 0.3,
        }
    }
}

impl RetryConfig {
    /// Exponential backoff, capped, with +/- jitter.
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.base_delay_ms as f64 * 2.0_f64.powi(attempt as i32);
        let capped = base.min(self.max_delay_ms as f64);

        let jitter_range = capped * self.jitter_factor;
        let jitter: f64 = if jitter_range > 0.0 {
            rand::thread_rng().gen_range(-jitter_range..=jitter_range)
        } else {
            0.0
        };
        Duration::from_millis((capped + jitter).max(0.0) as u64)
    }
}

/// Outcome of one attempt: permanent failures stop the loop early.
#[derive(Debug)]
pub enum Attempt<T> {
    Done(T),
    Retry(anyhow::Error),
    Fatal(anyhow::Error),
}

/// Retry a fallible async operation with exponential backoff.
pub async fn retry_async<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt<T>>,
{
    let mut last_error: Option<anyhow::Error> = None;

    for attempt in 0..=config.max_retries {
        match operation().await {
            Attempt::Done(result) => return Ok(result),
            Attempt::Fatal(e) => return Err(e),
            Attempt::Retry(e) => {
                if attempt < config.max_retries {
                    let delay = config.delay_for_attempt(attempt);
                    logging::log(
                        Level::Warn,
                        Domain::Feed,
                        "retry",
                        logging::obj(&[
                            ("operation", logging::v_str(operation_name)),
                            ("attempt", json!(attempt + 1)),
                            ("of", json!(config.max_retries + 1)),
                            ("error", logging::v_str(&e.to_string())),
                            ("delay_ms", json!(delay.as_millis() as u64)),
                        ]),
                    );
                    sleep(delay).await;
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow!("{} exhausted retries without error", operation_name)))
}

pub fn is_retryable_http_error(status: u16) -> bool {
    matches!(status,
        408 |   // Request Timeout
        429 |   // Too Many Requests
        500 |
        502 |
        503 |
        504
    )
}

pub fn is_retryable_network_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
