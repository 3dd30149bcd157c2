//! Driver page: profile plus career achievements.

use std::sync::{Mutex, MutexGuard};

use ergast_api::types::Driver;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::achievements::{AchievementsAggregator, DriverAchievements};
use crate::client::StatsClient;
use crate::config::Config;
use crate::error::F1StatsError;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DriverDetails {
    pub driver: Driver,
    pub achievements: DriverAchievements,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct DriverDetailsState {
    pub driver_id: Option<String>,
    pub details: Option<DriverDetails>,
    pub loading: bool,
    pub error: Option<String>,
}

struct Inner {
    view: DriverDetailsState,
    request: CancellationToken,
}

/// Store behind the driver page. Opening another driver cancels the
/// previous driver's requests.
pub struct DriverDetailsStore {
    client: StatsClient,
    aggregator: AchievementsAggregator,
    inner: Mutex<Inner>,
}

impl DriverDetailsStore {
    pub fn new(client: StatsClient, config: &Config) -> Self {
        Self {
            aggregator: AchievementsAggregator::new(client.clone(), config.results_page_size),
            client,
            inner: Mutex::new(Inner {
                view: DriverDetailsState::default(),
                request: CancellationToken::new(),
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(StatsClient::new(config), config)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Loads the profile and the achievements concurrently. Fails as a whole
    /// if either part fails.
    pub async fn fetch_driver_details(
        &self,
        driver_id: &str,
    ) -> Result<DriverDetails, F1StatsError> {
        let token = {
            let mut inner = self.lock();
            inner.request.cancel();
            inner.request = CancellationToken::new();
            inner.view = DriverDetailsState {
                driver_id: Some(driver_id.to_string()),
                details: None,
                loading: true,
                error: None,
            };
            inner.request.clone()
        };

        let result = tokio::try_join!(
            self.client.driver(driver_id, &token),
            self.aggregator.compute_achievements(driver_id, &token),
        )
        .and_then(|(driver, achievements)| match driver {
            Some(driver) => Ok(DriverDetails {
                driver,
                achievements,
            }),
            None => Err(F1StatsError::NotFound(format!("Driver {}", driver_id))),
        });

        let mut inner = self.lock();
        if token.is_cancelled() {
            tracing::debug!("Discarding superseded details for {}", driver_id);
            return Err(ergast_api::Error::Cancelled.into());
        }
        inner.view.loading = false;
        match result {
            Ok(details) => {
                inner.view.details = Some(details.clone());
                Ok(details)
            }
            Err(e) => {
                tracing::error!("Failed to load driver {}: {}", driver_id, e);
                inner.view.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    pub fn details(&self) -> Option<DriverDetails> {
        self.lock().view.details.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().view.loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().view.error.clone()
    }

    pub fn snapshot(&self) -> DriverDetailsState {
        self.lock().view.clone()
    }
}
