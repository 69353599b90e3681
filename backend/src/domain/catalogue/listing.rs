//! Page-bounded catalogue listing.

use std::sync::Arc;

use futures_util::future::try_join;
use pagination::{PageOutcome, PageRequest};
use tracing::{debug, warn};

use super::documents::{decode_all, map_store_error};
use crate::domain::ports::{Collection, DocumentStore, Filter, FindQuery, SortKey};
use crate::domain::{Error, Store};

/// Lists stores newest first, one page at a time.
///
/// Stores created at the same instant are ordered by id so page boundaries
/// are stable between requests.
pub struct PaginatedCatalogueLister<S> {
    store: Arc<S>,
}

impl<S> Clone for PaginatedCatalogueLister<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> PaginatedCatalogueLister<S>
where
    S: DocumentStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Fetch the requested window and the total count concurrently.
    ///
    /// An empty window past the first page resolves to
    /// [`PageOutcome::Overflow`] pointing at the last page.
    pub async fn list_page(&self, request: PageRequest) -> Result<PageOutcome<Store>, Error> {
        let find = FindQuery::new(Filter::All)
            .sort(vec![SortKey::descending("created"), SortKey::ascending("id")])
            .skip(request.offset())
            .limit(request.page_size());
        let all = Filter::All;
        let (documents, total_count) = try_join(
            self.store.find(Collection::Stores, &find),
            self.store.count(Collection::Stores, &all),
        )
        .await
        .map_err(map_store_error)?;
        let stores: Vec<Store> = decode_all(Collection::Stores, documents)?;
        let outcome = request.resolve(stores, total_count);
        match &outcome {
            PageOutcome::Overflow {
                requested_page,
                target_page,
            } => warn!(
                requested_page,
                target_page, total_count, "requested page is past the end of the catalogue"
            ),
            PageOutcome::Page(page) => debug!(
                page = page.page(),
                items = page.items().len(),
                total_count,
                "listed catalogue page"
            ),
        }
        Ok(outcome)
    }
}
