//! Results screen: season calendar and per-round classification.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Datelike;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::cache::ResultsCache;
use crate::client::StatsClient;
use crate::config::Config;
use crate::error::F1StatsError;
use crate::model::{RoundInfo, RoundResult};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResultsState {
    pub year: i32,
    pub current_round: u32,
    pub loading: bool,
    pub error: Option<String>,
    /// The last fetch succeeded but returned nothing (season or round not run yet).
    pub no_data: bool,
}

impl Default for ResultsState {
    fn default() -> Self {
        Self {
            year: chrono::Local::now().year(),
            current_round: 1,
            loading: false,
            error: None,
            no_data: false,
        }
    }
}

/// Calendar and classification requests run independently; a new request
/// only supersedes an older one of the same kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RequestKind {
    RoundList,
    Results,
}

struct Slot {
    token: CancellationToken,
    pending: bool,
}

impl Slot {
    fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            pending: false,
        }
    }
}

struct Inner {
    view: ResultsState,
    round_list: Slot,
    results: Slot,
}

impl Inner {
    fn slot(&mut self, kind: RequestKind) -> &mut Slot {
        match kind {
            RequestKind::RoundList => &mut self.round_list,
            RequestKind::Results => &mut self.results,
        }
    }

    fn sync_loading(&mut self) {
        self.view.loading = self.round_list.pending || self.results.pending;
    }
}

pub struct ResultsStore {
    client: StatsClient,
    cache: Arc<ResultsCache>,
    inner: Mutex<Inner>,
}

impl ResultsStore {
    pub fn new(client: StatsClient, cache: Arc<ResultsCache>) -> Self {
        Self {
            client,
            cache,
            inner: Mutex::new(Inner {
                view: ResultsState::default(),
                round_list: Slot::new(),
                results: Slot::new(),
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(StatsClient::new(config), Arc::new(ResultsCache::new()))
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Switches the season and rewinds to its first round.
    pub fn set_year(&self, year: i32) {
        let mut inner = self.lock();
        inner.view.year = year;
        inner.view.current_round = 1;
    }

    pub fn set_current_round(&self, round: u32) {
        self.lock().view.current_round = round;
    }

    fn begin_request(&self, kind: RequestKind) -> CancellationToken {
        let mut inner = self.lock();
        let slot = inner.slot(kind);
        slot.token.cancel();
        slot.token = CancellationToken::new();
        slot.pending = true;
        let token = slot.token.clone();
        inner.sync_loading();
        inner.view.error = None;
        inner.view.no_data = false;
        token
    }

    /// Commits a finished request unless a newer one of the same kind
    /// replaced it.
    fn finish_request<T>(
        &self,
        kind: RequestKind,
        token: &CancellationToken,
        result: Result<T, F1StatsError>,
        is_empty: impl FnOnce(&T) -> bool,
    ) -> Result<T, F1StatsError> {
        let mut inner = self.lock();
        if token.is_cancelled() {
            return Err(ergast_api::Error::Cancelled.into());
        }
        inner.slot(kind).pending = false;
        inner.sync_loading();
        match result {
            Ok(value) => {
                inner.view.no_data = is_empty(&value);
                Ok(value)
            }
            Err(e) => {
                if !e.is_cancelled() {
                    tracing::error!("Results request failed: {}", e);
                    inner.view.error = Some(e.user_message());
                }
                Err(e)
            }
        }
    }

    /// Calendar for `year`, from cache when already fetched.
    pub async fn fetch_round_list(&self, year: i32) -> Result<Vec<RoundInfo>, F1StatsError> {
        let kind = RequestKind::RoundList;
        let token = self.begin_request(kind);
        if let Some(rounds) = self.cache.round_list(year) {
            tracing::debug!("Round list for {} served from cache", year);
            return self.finish_request(kind, &token, Ok(rounds), |r| r.is_empty());
        }

        let result = self
            .client
            .season_races(year, &token)
            .await
            .map(|resp| {
                resp.data
                    .iter()
                    .filter_map(RoundInfo::from_race)
                    .collect::<Vec<_>>()
            });
        if let Ok(rounds) = &result {
            if !token.is_cancelled() {
                self.cache.put_round_list(year, rounds.clone());
            }
        }
        self.finish_request(kind, &token, result, |r| r.is_empty())
    }

    /// Classification of `round` in `year`, from cache when already fetched.
    pub async fn fetch_results(
        &self,
        year: i32,
        round: u32,
    ) -> Result<Vec<RoundResult>, F1StatsError> {
        if round == 0 {
            return Err(F1StatsError::InvalidInput(
                "round numbers start at 1".to_string(),
            ));
        }
        let kind = RequestKind::Results;
        let token = self.begin_request(kind);
        if let Some(results) = self.cache.results(year, round) {
            tracing::debug!("Results for {} round {} served from cache", year, round);
            return self.finish_request(kind, &token, Ok(results), |r| r.is_empty());
        }

        let result = self
            .client
            .round_results(year, round, &token)
            .await
            .map(|resp| resp.data.into_iter().map(RoundResult::from).collect::<Vec<_>>());
        if let Ok(results) = &result {
            if !token.is_cancelled() {
                self.cache.put_results(year, round, results.clone());
            }
        }
        self.finish_request(kind, &token, result, |r| r.is_empty())
    }

    pub fn year(&self) -> i32 {
        self.lock().view.year
    }

    pub fn current_round(&self) -> u32 {
        self.lock().view.current_round
    }

    pub fn is_loading(&self) -> bool {
        self.lock().view.loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().view.error.clone()
    }

    pub fn no_data(&self) -> bool {
        self.lock().view.no_data
    }

    /// Cached calendar of the selected year; empty until fetched.
    pub fn round_list(&self) -> Vec<RoundInfo> {
        let year = self.year();
        self.cache.round_list(year).unwrap_or_default()
    }

    /// Cached classification of the selected round; empty until fetched.
    pub fn results_for_current_round(&self) -> Vec<RoundResult> {
        let (year, round) = {
            let inner = self.lock();
            (inner.view.year, inner.view.current_round)
        };
        self.cache.results(year, round).unwrap_or_default()
    }

    pub fn snapshot(&self) -> ResultsState {
        self.lock().view.clone()
    }
}
