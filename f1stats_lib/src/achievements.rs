//! Career statistics derived from a driver's complete race history.

use std::collections::HashSet;

use ergast_api::types::Race;
use ergast_api::PageQuery;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::client::StatsClient;
use crate::error::F1StatsError;

/// Career totals for one driver.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct DriverAchievements {
    /// Seasons finished first in the championship. Comes from the
    /// standings endpoint, not from race wins.
    pub championships: u64,
    pub wins: u64,
    pub second_places: u64,
    pub third_places: u64,
    pub podiums: u64,
    pub pole_positions: u64,
    pub career_points: f64,
    pub seasons: u64,
}

impl DriverAchievements {
    pub fn summary(&self) -> AchievementSummary {
        AchievementSummary {
            championships: self.championships,
            wins: self.wins,
            first_places: self.wins,
            second_places: self.second_places,
            podiums: self.podiums,
            pole_positions: self.pole_positions,
        }
    }
}

/// Headline numbers shown on the driver page.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementSummary {
    pub championships: u64,
    pub wins: u64,
    /// Same as `wins`.
    pub first_places: u64,
    pub second_places: u64,
    pub podiums: u64,
    pub pole_positions: u64,
}

/// Running totals folded over result pages as they arrive.
#[derive(Debug, Default)]
pub struct AchievementTally {
    wins: u64,
    second_places: u64,
    third_places: u64,
    podiums: u64,
    pole_positions: u64,
    career_points: f64,
    seasons: HashSet<String>,
}

impl AchievementTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one race. The history endpoint filters results to the driver,
    /// so only the first result entry is considered.
    pub fn record(&mut self, race: &Race) {
        self.seasons.insert(race.season.clone());
        let Some(result) = race.results.first() else {
            return;
        };
        match result.position.trim() {
            "1" => self.wins += 1,
            "2" => self.second_places += 1,
            "3" => self.third_places += 1,
            _ => {}
        }
        if matches!(result.position.trim(), "1" | "2" | "3") {
            self.podiums += 1;
        }
        if result.grid.as_deref().map(str::trim) == Some("1") {
            self.pole_positions += 1;
        }
        self.career_points += result.points.trim().parse::<f64>().unwrap_or(0.0);
    }

    pub fn finish(self, championships: u64) -> DriverAchievements {
        DriverAchievements {
            championships,
            wins: self.wins,
            second_places: self.second_places,
            third_places: self.third_places,
            podiums: self.podiums,
            pole_positions: self.pole_positions,
            career_points: self.career_points,
            seasons: self.seasons.len() as u64,
        }
    }
}

/// Walks a driver's result history and reduces it to [`DriverAchievements`].
pub struct AchievementsAggregator {
    client: StatsClient,
    page_size: u64,
}

impl AchievementsAggregator {
    pub fn new(client: StatsClient, page_size: u64) -> Self {
        Self {
            client,
            page_size: page_size.max(1),
        }
    }

    /// Fetches every page of `driver_id`'s results and folds them, then looks
    /// up the championship count separately.
    ///
    /// Paging stops once the offset reaches the reported total; a missing or
    /// zero total stops after the first response. Any failed request fails
    /// the whole computation.
    pub async fn compute_achievements(
        &self,
        driver_id: &str,
        cancel: &CancellationToken,
    ) -> Result<DriverAchievements, F1StatsError> {
        if driver_id.trim().is_empty() {
            return Err(F1StatsError::InvalidInput(
                "driver id must not be empty".to_string(),
            ));
        }

        let mut tally = AchievementTally::new();
        let mut offset = 0u64;
        loop {
            let query = PageQuery {
                limit: Some(self.page_size),
                offset,
            };
            let page = self
                .client
                .driver_results(driver_id, &query, cancel)
                .await?;
            for race in &page.data {
                tally.record(race);
            }
            offset += self.page_size;
            tracing::debug!(
                "Folded {} races for {} ({} of {})",
                page.data.len(),
                driver_id,
                offset.min(page.total),
                page.total
            );
            if offset >= page.total {
                break;
            }
        }

        let championships = self
            .client
            .driver_championships(driver_id, cancel)
            .await?
            .total;

        Ok(tally.finish(championships))
    }
}
