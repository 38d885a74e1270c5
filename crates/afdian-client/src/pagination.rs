/*
[INPUT]:  A page fetcher for one list endpoint
[OUTPUT]: Every page's records flattened in page order
[POS]:    Aggregation layer - sequential walk over paged endpoints
[UPDATE]: When page discovery or skip rules change
*/

use std::future::Future;

use crate::http::{AfdianClient, Result};
use crate::types::{Aggregate, CacheState, Page, Record};

/// Fetch page 1, then pages 2..=total_page, strictly in order.
///
/// A first page without a list yields an empty aggregate; a first page with
/// a list but no `total_page` yields that page alone. Later pages that fail
/// or come back without a list are skipped.
pub async fn fetch_all<T, F, Fut>(mut fetch_page: F) -> Aggregate<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let first = match fetch_page(1).await {
        Ok(page) => page,
        Err(err) => {
            tracing::warn!(page = 1, error = %err, "first page unavailable, aggregate is empty");
            return Aggregate::empty();
        }
    };

    let Some(mut list) = first.list else {
        tracing::warn!(page = 1, "first page has no list, aggregate is empty");
        return Aggregate::empty();
    };
    let total_page = first.total_page.unwrap_or(1);

    for page in 2..=total_page {
        match fetch_page(page).await {
            Ok(Page {
                list: Some(items), ..
            }) => list.extend(items),
            Ok(_) => tracing::warn!(page, total_page, "page has no list, skipped"),
            Err(err) => tracing::warn!(page, total_page, error = %err, "page skipped"),
        }
    }

    tracing::info!(total_page, records = list.len(), "pages aggregated");
    Aggregate::new(list, CacheState::None)
}

impl AfdianClient {
    /// Walk every page of the endpoint serving `T`
    pub async fn fetch_all<T: Record>(&self) -> Aggregate<T> {
        fetch_all(|page| self.get_page::<T>(page)).await
    }
}
