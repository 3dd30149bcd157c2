use url::Url;

use super::Query;

/// Limit/offset window understood by every Ergast endpoint.
///
/// `limit = None` leaves the server default (30) in place. The offset is
/// only written to the URL when it is non-zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub limit: Option<u64>,
    pub offset: u64,
}

impl PageQuery {
    /// Window for a 1-indexed page of `page_size` records.
    pub fn page(page: u64, page_size: u64) -> Self {
        Self {
            limit: Some(page_size),
            offset: page.saturating_sub(1).saturating_mul(page_size),
        }
    }
}

impl Query for PageQuery {
    fn get_page(&mut self) -> &mut PageQuery {
        self
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(limit) = self.limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        }
        if self.offset > 0 {
            url.query_pairs_mut()
                .append_pair("offset", &self.offset.to_string());
        }
        url
    }
}
