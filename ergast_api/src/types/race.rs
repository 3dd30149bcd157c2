//! Races and per-race classification.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Constructor, Driver};

/// A single round of a season. `results` is only populated by results endpoints.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub season: String,

    pub round: String,

    pub race_name: String,

    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(rename = "Results", default)]
    pub results: Vec<RaceResult>,
}

impl Race {
    pub fn round_number(&self) -> Option<u32> {
        self.round.trim().parse().ok()
    }
}

/// One classified car in a race.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    #[serde(default)]
    pub number: Option<String>,

    pub position: String,

    #[serde(default)]
    pub position_text: Option<String>,

    pub points: String,

    #[serde(rename = "Driver")]
    pub driver: Driver,

    #[serde(rename = "Constructor", default)]
    pub constructor: Option<Constructor>,

    /// Starting grid slot; "0" means a pit-lane start.
    #[serde(default)]
    pub grid: Option<String>,

    #[serde(default)]
    pub laps: Option<String>,

    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RaceTable {
    #[serde(default)]
    pub season: Option<String>,

    #[serde(rename = "Races")]
    pub races: Vec<Race>,
}
