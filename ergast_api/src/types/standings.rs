//! Championship standings.

use serde::{Deserialize, Serialize};

use super::{Constructor, Driver};

/// One driver's row in a season's standings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriverStanding {
    /// Absent for drivers excluded from the classification.
    #[serde(default)]
    pub position: Option<String>,

    #[serde(default)]
    pub position_text: Option<String>,

    pub points: String,

    #[serde(default)]
    pub wins: Option<String>,

    #[serde(rename = "Driver")]
    pub driver: Driver,

    #[serde(rename = "Constructors", default)]
    pub constructors: Vec<Constructor>,
}

/// Standings after a given round of a season.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StandingsList {
    pub season: String,

    #[serde(default)]
    pub round: Option<String>,

    #[serde(rename = "DriverStandings", default)]
    pub driver_standings: Vec<DriverStanding>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StandingsTable {
    #[serde(default)]
    pub season: Option<String>,

    #[serde(rename = "StandingsLists")]
    pub standings_lists: Vec<StandingsList>,
}
