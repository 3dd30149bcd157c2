//! Standings screen state: year navigation, load-more and selectors.
//!
//! Every year navigation owns a fresh [`CancellationToken`]. Starting a new
//! navigation cancels the previous token under the same lock that guards the
//! visible state, and results are only committed while holding that lock
//! with an uncancelled token. A response for a year the user already left
//! therefore never reaches the visible state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::cache::{SeasonCache, SeasonEntry};
use crate::client::StatsClient;
use crate::config::Config;
use crate::error::F1StatsError;
use crate::model::StandingEntry;
use crate::pagination::{PaginationController, StandingsPage};

/// What the standings screen renders.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StandingsState {
    pub year: Option<i32>,
    pub standings: Vec<StandingEntry>,
    /// First page of a year in flight.
    pub loading: bool,
    /// A "load more" page in flight. Doubles as the load-more guard.
    pub loading_more: bool,
    pub error: Option<String>,
    pub has_more: bool,
    pub current_page: u64,
    /// The year loaded fine and has no standings (e.g. not started yet).
    pub no_data_for_year: bool,
    pub loaded_from_cache: bool,
}

impl Default for StandingsState {
    fn default() -> Self {
        Self {
            year: None,
            standings: Vec::new(),
            loading: false,
            loading_more: false,
            error: None,
            has_more: true,
            current_page: 0,
            no_data_for_year: false,
            loaded_from_cache: false,
        }
    }
}

struct Inner {
    view: StandingsState,
    navigation: CancellationToken,
}

/// Store behind the standings screen.
pub struct StandingsStore {
    controller: PaginationController,
    debounce: Duration,
    inner: Mutex<Inner>,
    debounce_ticket: AtomicU64,
}

impl StandingsStore {
    pub fn new(client: StatsClient, cache: Arc<SeasonCache>, config: &Config) -> Self {
        Self {
            controller: PaginationController::new(client, cache, config.standings_page_size),
            debounce: config.debounce,
            inner: Mutex::new(Inner {
                view: StandingsState::default(),
                navigation: CancellationToken::new(),
            }),
            debounce_ticket: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            StatsClient::new(config),
            Arc::new(SeasonCache::new()),
            config,
        )
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Cancels whatever the previous navigation still has in flight and
    /// hands out the token for a new one.
    fn begin_navigation(inner: &mut Inner, year: i32, loading: bool) -> CancellationToken {
        inner.navigation.cancel();
        inner.navigation = CancellationToken::new();
        inner.view = StandingsState {
            year: Some(year),
            loading,
            ..StandingsState::default()
        };
        inner.navigation.clone()
    }

    /// Shows `year`, loading its first page from cache or network.
    ///
    /// Resolves to `Cancelled` when a later navigation superseded this one;
    /// the visible state then belongs to the later navigation.
    pub async fn select_year(&self, year: i32) -> Result<StandingsPage, F1StatsError> {
        let token = {
            let mut inner = self.lock();
            Self::begin_navigation(&mut inner, year, true)
        };

        let result = self.controller.load_page(year, 1, &token).await;

        let mut inner = self.lock();
        if token.is_cancelled() {
            tracing::debug!("Discarding superseded standings load for {}", year);
            return Err(ergast_api::Error::Cancelled.into());
        }
        let view = &mut inner.view;
        view.loading = false;
        match result {
            Ok(page) => {
                view.current_page = self.controller.pages_loaded(page.next_offset).max(1);
                view.standings = page.entries.clone();
                view.has_more = page.has_more;
                view.error = None;
                view.no_data_for_year = page.entries.is_empty();
                view.loaded_from_cache = page.from_cache;
                Ok(page)
            }
            Err(e) => {
                if !e.is_cancelled() {
                    tracing::error!("Failed to load standings for {}: {}", year, e);
                    view.error = Some(e.user_message());
                    view.has_more = false;
                }
                view.no_data_for_year = false;
                Err(e)
            }
        }
    }

    /// Like [`select_year`](Self::select_year), but waits for the configured
    /// quiet period first. Only the last of several rapid calls loads
    /// anything; the others resolve to `Ok(None)` without a request.
    pub async fn select_year_debounced(
        &self,
        year: i32,
    ) -> Result<Option<StandingsPage>, F1StatsError> {
        let ticket = self.debounce_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.debounce).await;
        if self.debounce_ticket.load(Ordering::SeqCst) != ticket {
            tracing::debug!("Year {} superseded during debounce", year);
            return Ok(None);
        }
        self.select_year(year).await.map(Some)
    }

    /// Loads the next page of the visible year.
    ///
    /// No-op (`Ok(None)`) when nothing is selected, the first page is still
    /// loading, there is nothing more to load, or another load-more is
    /// already in flight.
    pub async fn load_more(&self) -> Result<Option<StandingsPage>, F1StatsError> {
        let (year, page, token) = {
            let mut inner = self.lock();
            let view = &inner.view;
            let Some(year) = view.year else {
                return Ok(None);
            };
            if view.loading || view.loading_more || !view.has_more {
                return Ok(None);
            }
            let page = view.current_page + 1;
            inner.view.loading_more = true;
            (year, page, inner.navigation.clone())
        };

        let result = self.controller.load_page(year, page, &token).await;

        let mut inner = self.lock();
        if token.is_cancelled() {
            tracing::debug!("Discarding superseded page {} for {}", page, year);
            return Err(ergast_api::Error::Cancelled.into());
        }
        let view = &mut inner.view;
        view.loading_more = false;
        match result {
            Ok(loaded) => {
                if loaded.applied {
                    view.standings.extend(loaded.entries.iter().cloned());
                    view.current_page = page;
                }
                view.has_more = loaded.has_more;
                view.error = None;
                Ok(Some(loaded))
            }
            Err(e) => {
                if !e.is_cancelled() {
                    tracing::error!("Failed to load page {} for {}: {}", page, year, e);
                    view.error = Some(e.user_message());
                }
                Err(e)
            }
        }
    }

    /// Drops the cached standings for `year`. If it is the visible year,
    /// in-flight loads are cancelled and the view starts over empty.
    pub fn reset_year(&self, year: i32) {
        self.controller.reset(year, || {
            let mut inner = self.lock();
            if inner.view.year == Some(year) {
                Self::begin_navigation(&mut inner, year, false);
            }
        });
    }

    /// Cancels any in-flight load without changing the selected year.
    pub fn cancel(&self) {
        let mut inner = self.lock();
        inner.navigation.cancel();
        inner.navigation = CancellationToken::new();
        inner.view.loading = false;
        inner.view.loading_more = false;
    }

    pub fn standings(&self) -> Vec<StandingEntry> {
        self.lock().view.standings.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().view.loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.lock().view.loading_more
    }

    pub fn error(&self) -> Option<String> {
        self.lock().view.error.clone()
    }

    pub fn has_more(&self) -> bool {
        self.lock().view.has_more
    }

    pub fn no_data_for_year(&self) -> bool {
        self.lock().view.no_data_for_year
    }

    pub fn current_year(&self) -> Option<i32> {
        self.lock().view.year
    }

    pub fn current_page(&self) -> u64 {
        self.lock().view.current_page
    }

    pub fn loaded_from_cache(&self) -> bool {
        self.lock().view.loaded_from_cache
    }

    pub fn cached_year(&self, year: i32) -> Option<SeasonEntry> {
        self.controller.cache().get(year)
    }

    pub fn snapshot(&self) -> StandingsState {
        self.lock().view.clone()
    }
}
