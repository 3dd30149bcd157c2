//! Shared query infrastructure: the [`Query`] trait.

use url::Url;

use super::PageQuery;

/// Trait implemented by all query builders. Provides URL serialization and
/// shared builder methods for limit/offset pagination.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Returns a mutable reference to the pagination window.
    fn get_page(&mut self) -> &mut PageQuery;

    /// Sets the maximum number of records per response.
    fn with_limit(mut self, limit: u64) -> Self
    where
        Self: Sized,
    {
        self.get_page().limit = Some(limit);
        self
    }

    /// Sets the number of records to skip.
    fn with_offset(mut self, offset: u64) -> Self
    where
        Self: Sized,
    {
        self.get_page().offset = offset;
        self
    }
}
