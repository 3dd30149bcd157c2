//! Runtime configuration, read from `F1STATS_*` environment variables.

use std::time::Duration;

use rand::Rng;

/// Backoff settings for retryable request failures.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 8000,
        }
    }
}

impl RetryConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_usize("F1STATS_RETRY_MAX", defaults.max_retries),
            base_delay_ms: env_u64("F1STATS_RETRY_BASE_MS", defaults.base_delay_ms),
            max_delay_ms: env_u64("F1STATS_RETRY_MAX_MS", defaults.max_delay_ms),
        }
    }

    /// Retries disabled. Failures surface on the first attempt.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Exponential backoff with +/-20% jitter, capped at `max_delay_ms`.
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

/// Settings shared by the stores.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub request_timeout: Duration,
    /// Standings rows per page.
    pub standings_page_size: u64,
    /// Races per request while walking a driver's history.
    pub results_page_size: u64,
    /// Quiet period before a year change triggers a fetch.
    pub debounce: Duration,
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://api.jolpi.ca/ergast/f1".to_string(),
            request_timeout: Duration::from_secs(10),
            standings_page_size: 10,
            results_page_size: 100,
            debounce: Duration::from_millis(300),
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("F1STATS_BASE_URL").unwrap_or(defaults.base_url),
            request_timeout: Duration::from_secs(env_u64(
                "F1STATS_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            standings_page_size: env_u64(
                "F1STATS_STANDINGS_PAGE_SIZE",
                defaults.standings_page_size,
            )
            .max(1),
            results_page_size: env_u64("F1STATS_RESULTS_PAGE_SIZE", defaults.results_page_size)
                .max(1),
            debounce: Duration::from_millis(env_u64(
                "F1STATS_DEBOUNCE_MS",
                defaults.debounce.as_millis() as u64,
            )),
            retry: RetryConfig::from_env(),
        }
    }

    /// Defaults pointed at another server. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}
