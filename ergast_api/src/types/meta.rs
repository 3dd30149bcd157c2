//! The `MRData` envelope shared by every Ergast response.

use serde::{Deserialize, Serialize};

use super::{DriverTable, RaceTable, StandingsTable};
use crate::Error;

/// Top-level JSON document: `{ "MRData": { ... } }`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Response {
    #[serde(rename = "MRData")]
    pub mr_data: MrData,
}

/// Envelope carrying pagination counters and exactly one table.
///
/// Counters arrive as strings. Which table is present depends on the
/// endpoint, so all of them are optional here and the client asks for the
/// one it expects.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MrData {
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub offset: Option<String>,
    #[serde(default)]
    pub total: Option<String>,

    #[serde(rename = "StandingsTable", default)]
    pub standings_table: Option<StandingsTable>,

    #[serde(rename = "RaceTable", default)]
    pub race_table: Option<RaceTable>,

    #[serde(rename = "DriverTable", default)]
    pub driver_table: Option<DriverTable>,
}

impl MrData {
    /// Server-reported record count. Missing or garbled totals count as zero.
    pub fn total(&self) -> u64 {
        parse_counter(self.total.as_deref())
    }

    pub fn limit(&self) -> u64 {
        parse_counter(self.limit.as_deref())
    }

    pub fn offset(&self) -> u64 {
        parse_counter(self.offset.as_deref())
    }

    pub fn into_standings_table(self) -> Result<StandingsTable, Error> {
        self.standings_table
            .ok_or_else(|| Error::DataShape("missing StandingsTable".to_string()))
    }

    pub fn into_race_table(self) -> Result<RaceTable, Error> {
        self.race_table
            .ok_or_else(|| Error::DataShape("missing RaceTable".to_string()))
    }

    pub fn into_driver_table(self) -> Result<DriverTable, Error> {
        self.driver_table
            .ok_or_else(|| Error::DataShape("missing DriverTable".to_string()))
    }
}

fn parse_counter(value: Option<&str>) -> u64 {
    value.and_then(|v| v.trim().parse::<u64>().ok()).unwrap_or(0)
}

/// One window of records plus the counters needed to page through the rest.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PaginatedResponse<T> {
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub data: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    /// Reads the counters off the envelope, then hands it to `extract` for the records.
    pub(crate) fn from_envelope<F>(meta: MrData, extract: F) -> Result<Self, Error>
    where
        F: FnOnce(MrData) -> Result<Vec<T>, Error>,
    {
        let (total, limit, offset) = (meta.total(), meta.limit(), meta.offset());
        Ok(Self {
            total,
            limit,
            offset,
            data: extract(meta)?,
        })
    }
}
