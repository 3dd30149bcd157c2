//! View models the stores hand to the UI.

use chrono::NaiveDate;
use ergast_api::types::{Constructor, Driver, DriverStanding, Race, RaceResult};
use serde::Serialize;

/// A driver's row in a season's standings, tagged with the season it belongs to.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StandingEntry {
    pub position: Option<String>,
    pub position_text: String,
    pub points: String,
    pub wins: String,
    pub driver: Driver,
    pub constructors: Vec<Constructor>,
    pub season: i32,
}

impl StandingEntry {
    pub fn from_standing(season: i32, standing: DriverStanding) -> Self {
        let position_text = standing
            .position_text
            .or_else(|| standing.position.clone())
            .unwrap_or_else(|| "-".to_string());
        Self {
            position: standing.position,
            position_text,
            points: standing.points,
            wins: standing.wins.unwrap_or_else(|| "0".to_string()),
            driver: standing.driver,
            constructors: standing.constructors,
            season,
        }
    }

    pub fn driver_id(&self) -> &str {
        &self.driver.driver_id
    }
}

/// One entry of a season calendar.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RoundInfo {
    pub round: u32,
    /// Race name without the " Grand Prix" suffix ("Bahrain", "Emilia Romagna").
    pub race_name: String,
    pub date: Option<NaiveDate>,
}

impl RoundInfo {
    /// `None` for races whose round number cannot be read.
    pub fn from_race(race: &Race) -> Option<Self> {
        let round = race.round_number()?;
        let race_name = race
            .race_name
            .strip_suffix(" Grand Prix")
            .unwrap_or(&race.race_name)
            .to_string();
        Some(Self {
            round,
            race_name,
            date: race.date,
        })
    }
}

/// One line of a race classification.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub position: String,
    pub driver_id: String,
    pub driver_name: String,
    pub constructor: Option<String>,
    pub grid: Option<String>,
    pub points: String,
    pub status: Option<String>,
}

impl From<RaceResult> for RoundResult {
    fn from(result: RaceResult) -> Self {
        Self {
            driver_name: result.driver.full_name(),
            driver_id: result.driver.driver_id,
            position: result.position,
            constructor: result.constructor.map(|c| c.name),
            grid: result.grid,
            points: result.points,
            status: result.status,
        }
    }
}
