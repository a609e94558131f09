//! Bounded retries around individual fetches.
//!
//! Only the transport is retried. A body that arrives but does not parse is
//! a structural failure and still aborts the crawl.

use std::time::Duration;

use mlszdb_core::fetch::{ApiRequest, Fetcher};
use tokio::time::sleep;
use tracing::{debug, warn};

/// How many times to retry a failed fetch, and how long to wait between.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
  /// Retries after the first attempt; `0` disables retrying.
  pub max_retries:   u32,
  pub initial_delay: Duration,
  pub max_delay:     Duration,
  pub multiplier:    f64,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_retries:   0,
      initial_delay: Duration::from_millis(500),
      max_delay:     Duration::from_secs(30),
      multiplier:    2.0,
    }
  }
}

impl RetryPolicy {
  pub fn with_retries(max_retries: u32) -> Self { Self { max_retries, ..Self::default() } }

  fn delay_for_attempt(&self, attempt: u32) -> Duration {
    let millis = self.initial_delay.as_millis() as f64 * self.multiplier.powi(attempt as i32);
    Duration::from_millis(millis as u64).min(self.max_delay)
  }
}

/// A [`Fetcher`] that retries its inner fetcher per [`RetryPolicy`].
pub struct RetryingFetcher<F> {
  inner:  F,
  policy: RetryPolicy,
}

impl<F> RetryingFetcher<F> {
  pub fn new(inner: F, policy: RetryPolicy) -> Self { Self { inner, policy } }
}

impl<F: Fetcher> Fetcher for RetryingFetcher<F> {
  type Error = F::Error;

  async fn fetch(&self, request: &ApiRequest) -> Result<String, F::Error> {
    let mut attempt = 0;
    loop {
      match self.inner.fetch(request).await {
        Ok(body) => {
          if attempt > 0 {
            debug!(%request, attempt, "fetch succeeded after retry");
          }
          return Ok(body);
        }
        Err(e) if attempt < self.policy.max_retries => {
          let delay = self.policy.delay_for_attempt(attempt);
          warn!(%request, attempt, error = %e, ?delay, "fetch failed; retrying");
          sleep(delay).await;
          attempt += 1;
        }
        Err(e) => return Err(e),
      }
    }
  }
}
