//! Retrying wrapper around the API client.

use ergast_api::types::{Driver, DriverStanding, PaginatedResponse, Race, RaceResult, StandingsList};
use ergast_api::{Client, PageQuery};
use tokio_util::sync::CancellationToken;

use crate::config::{Config, RetryConfig};
use crate::error::F1StatsError;

/// API client wrapper that retries transient failures.
///
/// Transport errors, 429 and 5xx responses are retried with exponential
/// backoff. Cancellation and malformed responses are returned immediately,
/// and a cancelled token also cuts a pending backoff short.
#[derive(Clone)]
pub struct StatsClient {
    inner: Client,
    retry: RetryConfig,
}

impl StatsClient {
    pub fn new(config: &Config) -> Self {
        Self {
            inner: Client::with_options(&config.base_url, config.request_timeout),
            retry: config.retry.clone(),
        }
    }

    /// Wraps an existing client. Used for testing.
    pub fn with_client(inner: Client, retry: RetryConfig) -> Self {
        Self { inner, retry }
    }

    async fn with_retry<T, F, Fut>(
        &self,
        label: &str,
        cancel: &CancellationToken,
        mut f: F,
    ) -> Result<T, F1StatsError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ergast_api::Error>>,
    {
        let mut attempt = 0usize;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !is_retryable(&err) {
                        return Err(err.into());
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        label,
                        attempt,
                        self.retry.max_retries,
                        delay.as_secs_f64(),
                        err
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            return Err(ergast_api::Error::Cancelled.into());
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    pub async fn driver_standings(
        &self,
        year: i32,
        query: &PageQuery,
        cancel: &CancellationToken,
    ) -> Result<PaginatedResponse<DriverStanding>, F1StatsError> {
        self.with_retry("standings", cancel, || {
            self.inner.get_driver_standings(year, query, cancel)
        })
        .await
    }

    pub async fn driver(
        &self,
        driver_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Driver>, F1StatsError> {
        self.with_retry("driver", cancel, || self.inner.get_driver(driver_id, cancel))
            .await
    }

    pub async fn driver_results(
        &self,
        driver_id: &str,
        query: &PageQuery,
        cancel: &CancellationToken,
    ) -> Result<PaginatedResponse<Race>, F1StatsError> {
        self.with_retry("driver results", cancel, || {
            self.inner.get_driver_results(driver_id, query, cancel)
        })
        .await
    }

    pub async fn driver_championships(
        &self,
        driver_id: &str,
        cancel: &CancellationToken,
    ) -> Result<PaginatedResponse<StandingsList>, F1StatsError> {
        self.with_retry("championships", cancel, || {
            self.inner.get_driver_championships(driver_id, cancel)
        })
        .await
    }

    pub async fn season_races(
        &self,
        year: i32,
        cancel: &CancellationToken,
    ) -> Result<PaginatedResponse<Race>, F1StatsError> {
        self.with_retry("season races", cancel, || {
            self.inner.get_season_races(year, cancel)
        })
        .await
    }

    pub async fn round_results(
        &self,
        year: i32,
        round: u32,
        cancel: &CancellationToken,
    ) -> Result<PaginatedResponse<RaceResult>, F1StatsError> {
        self.with_retry("round results", cancel, || {
            self.inner.get_round_results(year, round, cancel)
        })
        .await
    }
}

fn is_retryable(err: &ergast_api::Error) -> bool {
    match err {
        ergast_api::Error::Transport(_) => true,
        ergast_api::Error::HttpStatus { status, .. } => *status == 429 || *status >= 500,
        ergast_api::Error::Cancelled | ergast_api::Error::DataShape(_) => false,
    }
}
