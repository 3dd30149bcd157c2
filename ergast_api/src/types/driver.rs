//! Driver and constructor records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable Ergast driver identifier (e.g. "max_verstappen").
pub type DriverID = String;

/// Driver snapshot as returned by the API. Never merged across requests.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub driver_id: DriverID,

    /// Race number, only assigned to drivers from 2014 onwards.
    #[serde(default)]
    pub permanent_number: Option<String>,

    /// Three-letter abbreviation (e.g. "VER").
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    pub given_name: String,

    pub family_name: String,

    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,

    #[serde(default)]
    pub nationality: Option<String>,
}

impl Driver {
    /// "Given Family", the way results tables print a driver.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

/// Team record attached to standings and results.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Constructor {
    pub constructor_id: String,

    #[serde(default)]
    pub url: Option<String>,

    pub name: String,

    #[serde(default)]
    pub nationality: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DriverTable {
    #[serde(rename = "driverId", default)]
    pub driver_id: Option<DriverID>,

    #[serde(rename = "Drivers", default)]
    pub drivers: Vec<Driver>,
}
