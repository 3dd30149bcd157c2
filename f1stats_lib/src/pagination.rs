//! Page-by-page loading of season standings on top of [`SeasonCache`].

use std::sync::{Arc, Mutex, MutexGuard};

use ergast_api::PageQuery;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::cache::{AppendOutcome, SeasonCache};
use crate::client::StatsClient;
use crate::error::F1StatsError;
use crate::model::StandingEntry;

/// Outcome of [`PaginationController::load_page`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StandingsPage {
    pub year: i32,
    pub page: u64,
    /// For a cache hit, every cached row of the season; otherwise the rows
    /// this page added.
    pub entries: Vec<StandingEntry>,
    pub total: u64,
    /// Rows cached for the season after this load.
    pub loaded: u64,
    /// Offset the season's next page will be requested at.
    pub next_offset: u64,
    pub has_more: bool,
    pub from_cache: bool,
    /// False when the page arrived for an offset the cache no longer
    /// expected and was dropped.
    pub applied: bool,
}

/// Decides between cache and network for each standings page.
pub struct PaginationController {
    client: StatsClient,
    cache: Arc<SeasonCache>,
    page_size: u64,
    /// Held while a fetched page is checked against its token and written
    /// to the cache, and while a season is reset.
    commit: Mutex<()>,
}

impl PaginationController {
    pub fn new(client: StatsClient, cache: Arc<SeasonCache>, page_size: u64) -> Self {
        Self {
            client,
            cache,
            page_size: page_size.max(1),
            commit: Mutex::new(()),
        }
    }

    fn lock_commits(&self) -> MutexGuard<'_, ()> {
        self.commit.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn cache(&self) -> &Arc<SeasonCache> {
        &self.cache
    }

    /// Runs `cancel`, then forgets `year`. A page whose token `cancel`
    /// cancelled can no longer be written back afterwards.
    pub fn reset(&self, year: i32, cancel: impl FnOnce()) -> bool {
        let _commit = self.lock_commits();
        cancel();
        self.cache.reset(year)
    }

    /// Page number a season has reached, judged by where its next page
    /// starts rather than by how many rows survived dedup.
    pub fn pages_loaded(&self, next_offset: u64) -> u64 {
        next_offset / self.page_size
    }

    /// Loads page `page` (1-indexed) of `year`'s standings.
    ///
    /// Page 1 of a cached season is answered from the cache without a
    /// request. Any other page is fetched at `(page - 1) * page_size` and
    /// appended to the season's cache entry.
    pub async fn load_page(
        &self,
        year: i32,
        page: u64,
        cancel: &CancellationToken,
    ) -> Result<StandingsPage, F1StatsError> {
        if page == 0 {
            return Err(F1StatsError::InvalidInput(
                "page numbers start at 1".to_string(),
            ));
        }

        if page == 1 {
            if let Some(cached) = self.cache.get(year) {
                tracing::debug!("Standings for {} served from cache", year);
                let loaded = cached.standings.len() as u64;
                let aligned = cached.next_offset % self.page_size == 0;
                return Ok(StandingsPage {
                    year,
                    page,
                    entries: cached.standings,
                    total: cached.total,
                    loaded,
                    next_offset: cached.next_offset,
                    has_more: aligned && loaded < cached.total,
                    from_cache: true,
                    applied: true,
                });
            }
        }

        let query = PageQuery::page(page, self.page_size);
        tracing::debug!(
            "Fetching standings for {} page {} (offset {})",
            year,
            page,
            query.offset
        );
        let resp = self
            .client
            .driver_standings(year, &query, cancel)
            .await?;
        let fetched = resp.data.len() as u64;
        let entries: Vec<StandingEntry> = resp
            .data
            .into_iter()
            .map(|standing| StandingEntry::from_standing(year, standing))
            .collect();

        let commit = self.lock_commits();
        // A response that lost the race against cancellation must not touch the cache.
        if cancel.is_cancelled() {
            return Err(ergast_api::Error::Cancelled.into());
        }
        let (entries, applied) = if page == 1 {
            self.cache.put(year, entries, resp.total);
            let kept = self
                .cache
                .get(year)
                .map(|season| season.standings)
                .unwrap_or_default();
            (kept, true)
        } else {
            match self
                .cache
                .append_to(year, query.offset, entries.clone(), resp.total)
            {
                AppendOutcome::Appended(added) => {
                    let added_rows = self
                        .cache
                        .get(year)
                        .map(|season| {
                            let len = season.standings.len();
                            season.standings[len - added..].to_vec()
                        })
                        .unwrap_or_default();
                    (added_rows, true)
                }
                AppendOutcome::Missing => {
                    tracing::warn!("No cached first page for {}; page {} not stored", year, page);
                    (entries, false)
                }
                AppendOutcome::Stale => (Vec::new(), false),
            }
        };
        let season = self.cache.get(year);
        drop(commit);

        let (loaded, total, next_offset) = match season {
            Some(season) => (
                season.standings.len() as u64,
                season.total,
                season.next_offset,
            ),
            None => (0, resp.total, query.offset + fetched),
        };

        Ok(StandingsPage {
            year,
            page,
            entries,
            total,
            loaded,
            next_offset,
            has_more: has_more(loaded, total, fetched, self.page_size),
            from_cache: false,
            applied,
        })
    }
}

/// More rows exist only while the season is short of `total` *and* the last
/// page came back full. A short final page ends pagination even when the
/// reported total says otherwise.
pub fn has_more(loaded: u64, total: u64, last_page_len: u64, page_size: u64) -> bool {
    loaded < total && last_page_len == page_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_more_needs_both_conditions() {
        assert!(has_more(10, 21, 10, 10));
        assert!(!has_more(21, 21, 1, 10));
        assert!(!has_more(15, 21, 5, 10));
        assert!(!has_more(20, 20, 10, 10));
        assert!(!has_more(0, 0, 0, 10));
    }
}
