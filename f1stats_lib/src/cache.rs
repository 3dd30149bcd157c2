//! Session caches backed by `DashMap`. Nothing expires; entries go away
//! only through an explicit `reset`.

use std::collections::{BTreeMap, HashSet};

use dashmap::DashMap;

use crate::model::{RoundInfo, RoundResult, StandingEntry};

/// Standings fetched so far for one season.
#[derive(Clone, Debug, PartialEq)]
pub struct SeasonEntry {
    /// Rows in upstream order, unique by driver id.
    pub standings: Vec<StandingEntry>,
    /// Server-reported row count. Never below `standings.len()`.
    pub total: u64,
    /// Offset the next page must have been requested at to be accepted.
    pub next_offset: u64,
}

/// Result of [`SeasonCache::append_to`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The page was accepted; carries the number of rows added after dedup.
    Appended(usize),
    /// The page was fetched for an offset the cache no longer expects.
    Stale,
    /// No first page is cached for the season.
    Missing,
}

/// Per-season standings, keyed by year.
#[derive(Default)]
pub struct SeasonCache {
    store: DashMap<i32, SeasonEntry>,
}

impl SeasonCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, year: i32) -> Option<SeasonEntry> {
        self.store.get(&year).map(|entry| entry.clone())
    }

    pub fn contains(&self, year: i32) -> bool {
        self.store.contains_key(&year)
    }

    /// Starts (or replaces) a season with its first page.
    pub fn put(&self, year: i32, standings: Vec<StandingEntry>, total: u64) {
        let fetched = standings.len() as u64;
        let mut entry = SeasonEntry {
            standings: Vec::with_capacity(standings.len()),
            total,
            next_offset: fetched,
        };
        push_unique(&mut entry, standings);
        entry.total = entry.total.max(entry.standings.len() as u64);
        self.store.insert(year, entry);
    }

    /// Appends a page fetched at `offset`.
    ///
    /// Pages must arrive in order: a page whose offset differs from the
    /// season's expected next offset is dropped. Rows for drivers already
    /// present are skipped, and the season never grows past `total`.
    pub fn append_to(
        &self,
        year: i32,
        offset: u64,
        standings: Vec<StandingEntry>,
        total: u64,
    ) -> AppendOutcome {
        let Some(mut entry) = self.store.get_mut(&year) else {
            return AppendOutcome::Missing;
        };
        if offset != entry.next_offset {
            tracing::warn!(
                "Dropping standings page for {} at offset {} (expected {})",
                year,
                offset,
                entry.next_offset
            );
            return AppendOutcome::Stale;
        }
        entry.next_offset += standings.len() as u64;
        entry.total = total;
        let before = entry.standings.len();
        push_unique(&mut entry, standings);
        entry.total = entry.total.max(entry.standings.len() as u64);
        AppendOutcome::Appended(entry.standings.len() - before)
    }

    /// Forgets a season. Returns whether anything was cached.
    pub fn reset(&self, year: i32) -> bool {
        self.store.remove(&year).is_some()
    }

    pub fn clear(&self) {
        self.store.clear();
    }
}

fn push_unique(entry: &mut SeasonEntry, standings: Vec<StandingEntry>) {
    let mut seen: HashSet<String> = entry
        .standings
        .iter()
        .map(|s| s.driver_id().to_string())
        .collect();
    for standing in standings {
        if entry.total > 0 && entry.standings.len() as u64 >= entry.total {
            break;
        }
        if seen.insert(standing.driver_id().to_string()) {
            entry.standings.push(standing);
        }
    }
}

/// Calendar and classifications fetched for one season.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeasonResults {
    /// `None` until the calendar has been fetched.
    pub round_list: Option<Vec<RoundInfo>>,
    pub results_by_round: BTreeMap<u32, Vec<RoundResult>>,
}

/// Race calendars and per-round results, keyed by year.
#[derive(Default)]
pub struct ResultsCache {
    store: DashMap<i32, SeasonResults>,
}

impl ResultsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round_list(&self, year: i32) -> Option<Vec<RoundInfo>> {
        self.store
            .get(&year)
            .and_then(|season| season.round_list.clone())
    }

    pub fn put_round_list(&self, year: i32, rounds: Vec<RoundInfo>) {
        self.store.entry(year).or_default().round_list = Some(rounds);
    }

    pub fn results(&self, year: i32, round: u32) -> Option<Vec<RoundResult>> {
        self.store
            .get(&year)
            .and_then(|season| season.results_by_round.get(&round).cloned())
    }

    pub fn put_results(&self, year: i32, round: u32, results: Vec<RoundResult>) {
        self.store
            .entry(year)
            .or_default()
            .results_by_round
            .insert(round, results);
    }

    pub fn season(&self, year: i32) -> Option<SeasonResults> {
        self.store.get(&year).map(|season| season.clone())
    }

    pub fn reset(&self, year: i32) -> bool {
        self.store.remove(&year).is_some()
    }
}
