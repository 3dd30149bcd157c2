//! HTTP client for the Ergast-compatible F1 statistics API.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    query::{PageQuery, Query},
    types::{
        Driver, DriverStanding, MrData, PaginatedResponse, Race, RaceResult, Response,
        StandingsList,
    },
    Error,
};

const DEFAULT_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Seasons never have more rounds than this, so one request returns the whole calendar.
const SEASON_CALENDAR_LIMIT: u64 = 100;

/// HTTP client for the Ergast F1 API.
///
/// Every request takes a [`CancellationToken`]. Cancelling the token while a
/// request is outstanding drops the in-flight future and resolves to
/// [`Error::Cancelled`], so a superseded response can never be observed.
#[derive(Clone)]
pub struct Client {
    /// Base URL for the API. Defaults to `https://api.jolpi.ca/ergast/f1`.
    base_api_url: String,
    http: reqwest::Client,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the public API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_options(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a new client with a custom base URL and per-request timeout.
    pub fn with_options(base_url: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build HTTP client, using defaults: {}", e);
                reqwest::Client::new()
            });
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    fn get_url(&self, path: &str, query: Option<&impl Query>) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::Transport(format!("invalid url: {}", e))
        })?;
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    async fn get<Q>(
        &self,
        path: &str,
        query: Option<&Q>,
        cancel: &CancellationToken,
    ) -> Result<MrData, Error>
    where
        Q: Query,
    {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let url = self.get_url(path, query)?;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Request to {} cancelled", url);
                Err(Error::Cancelled)
            }
            result = self.fetch(url.clone()) => result,
        }
    }

    async fn fetch(&self, url: Url) -> Result<MrData, Error> {
        tracing::debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::Transport(e.to_string())
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Transport(e.to_string())
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let parsed = serde_json::from_str::<Response>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::DataShape(e.to_string())
        })?;

        Ok(parsed.mr_data)
    }

    /// Fetches one window of a season's driver standings.
    ///
    /// Seasons without standings yet (empty `StandingsLists`) yield an empty
    /// page, not an error.
    pub async fn get_driver_standings(
        &self,
        year: i32,
        query: &PageQuery,
        cancel: &CancellationToken,
    ) -> Result<PaginatedResponse<DriverStanding>, Error> {
        let meta = self
            .get(&format!("/{}/driverStandings.json", year), Some(query), cancel)
            .await?;
        PaginatedResponse::from_envelope(meta, |meta| {
            let table = meta.into_standings_table()?;
            Ok(table
                .standings_lists
                .into_iter()
                .next()
                .map(|list| list.driver_standings)
                .unwrap_or_default())
        })
    }

    /// Fetches a single driver by ID. `None` when the API does not know the driver.
    pub async fn get_driver(
        &self,
        driver_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Driver>, Error> {
        let meta = self
            .get::<PageQuery>(&format!("/drivers/{}.json", driver_id), None, cancel)
            .await?;
        let table = meta.into_driver_table()?;
        Ok(table.drivers.into_iter().next())
    }

    /// Fetches one window of a driver's race history, one race per entry.
    pub async fn get_driver_results(
        &self,
        driver_id: &str,
        query: &PageQuery,
        cancel: &CancellationToken,
    ) -> Result<PaginatedResponse<Race>, Error> {
        let meta = self
            .get(
                &format!("/drivers/{}/results.json", driver_id),
                Some(query),
                cancel,
            )
            .await?;
        PaginatedResponse::from_envelope(meta, |meta| Ok(meta.into_race_table()?.races))
    }

    /// Fetches the seasons a driver finished first in the championship.
    ///
    /// `total` of the response is the championship count.
    pub async fn get_driver_championships(
        &self,
        driver_id: &str,
        cancel: &CancellationToken,
    ) -> Result<PaginatedResponse<StandingsList>, Error> {
        let meta = self
            .get::<PageQuery>(
                &format!("/drivers/{}/driverStandings/1.json", driver_id),
                None,
                cancel,
            )
            .await?;
        PaginatedResponse::from_envelope(meta, |meta| {
            Ok(meta.into_standings_table()?.standings_lists)
        })
    }

    /// Fetches a season's calendar.
    pub async fn get_season_races(
        &self,
        year: i32,
        cancel: &CancellationToken,
    ) -> Result<PaginatedResponse<Race>, Error> {
        let query = PageQuery::default().with_limit(SEASON_CALENDAR_LIMIT);
        let meta = self
            .get(&format!("/{}.json", year), Some(&query), cancel)
            .await?;
        PaginatedResponse::from_envelope(meta, |meta| Ok(meta.into_race_table()?.races))
    }

    /// Fetches the classification of one round. Rounds not yet run yield an empty page.
    pub async fn get_round_results(
        &self,
        year: i32,
        round: u32,
        cancel: &CancellationToken,
    ) -> Result<PaginatedResponse<RaceResult>, Error> {
        let meta = self
            .get::<PageQuery>(&format!("/{}/{}/results.json", year, round), None, cancel)
            .await?;
        PaginatedResponse::from_envelope(meta, |meta| {
            Ok(meta
                .into_race_table()?
                .races
                .into_iter()
                .next()
                .map(|race| race.results)
                .unwrap_or_default())
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
