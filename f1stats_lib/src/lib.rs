//! Library layer for the F1 stats app: retrying API client, session caches,
//! standings pagination, driver achievements and the stores the UI reads.
//!
//! Wraps the `ergast_api` crate. Each store owns its view state and hands
//! out snapshots through plain accessor methods; actions are async methods
//! that can be called concurrently from any task.

pub mod achievements;
pub mod cache;
pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod model;
pub mod pagination;
pub mod results;
pub mod standings;

pub use ergast_api;
pub use ergast_api::types;
pub use ergast_api::CancellationToken;

pub use achievements::{AchievementSummary, AchievementsAggregator, DriverAchievements};
pub use cache::{AppendOutcome, ResultsCache, SeasonCache, SeasonEntry};
pub use client::StatsClient;
pub use config::{Config, RetryConfig};
pub use driver::{DriverDetails, DriverDetailsStore};
pub use error::F1StatsError;
pub use model::{RoundInfo, RoundResult, StandingEntry};
pub use pagination::{PaginationController, StandingsPage};
pub use results::ResultsStore;
pub use standings::{StandingsState, StandingsStore};
