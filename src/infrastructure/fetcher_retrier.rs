use std::{sync::Arc, time::Duration};

use log::warn;
use tokio::time::sleep;

use crate::{FetcherError, RepositoryFetcher, RepositoryKey, UpstreamRepository};

/// Upper bound of the delay between two attempts.
const MAX_BACKOFF_DELAY: Duration = Duration::from_secs(30);

/// A struct that retries a RepositoryFetcher a specified number of times in case of retryable failure with exponential backoff strategy.
pub struct FetcherRetrier {
    /// The fetcher to be retried.
    fetcher: Arc<dyn RepositoryFetcher>,

    /// The maximum number of attempts for a request.
    max_retries: u32,

    /// The base delay for exponential backoff.
    base_delay: Duration,
}

impl FetcherRetrier {
    /// Creates a new `FetcherRetrier` instance with the given maximum number of retries.
    pub fn new(fetcher: Arc<dyn RepositoryFetcher>, max_retries: u32, base_delay: Duration) -> Self {
        Self {
            fetcher,
            max_retries,
            base_delay,
        }
    }

    fn calculate_exponential_backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(MAX_BACKOFF_DELAY)
    }
}

#[async_trait::async_trait]
impl RepositoryFetcher for FetcherRetrier {
    /// Retries the request if it fails with a retryable error, up to the maximum number of retries.
    async fn fetch(
        &self,
        key: &RepositoryKey,
    ) -> Result<Option<UpstreamRepository>, FetcherError> {
        let mut attempts = 0;

        loop {
            match self.fetcher.fetch(key).await {
                Ok(res) => return Ok(res),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    warn!("Fetch attempt #{} for {key} failed: {}", attempts + 1, e);
                    attempts += 1;
                    if attempts >= self.max_retries {
                        return Err(e);
                    }
                    sleep(self.calculate_exponential_backoff_delay(attempts)).await;
                }
            }
        }
    }
}
