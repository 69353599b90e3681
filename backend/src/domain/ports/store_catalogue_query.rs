//! Driving port for catalogue reads.
//!
//! Inbound adapters depend on this trait rather than on the services that
//! implement it, so HTTP handlers can be tested against a mock.

use async_trait::async_trait;
use pagination::{PageOutcome, PageRequest};

use crate::domain::{
    Error, GeoPoint, ScoredStore, Store, StoreDetail, StoreSummary, TagBrowse, TagCount, TopStore,
};

/// Read-side catalogue operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreCatalogueQuery: Send + Sync {
    /// One page of stores, newest first, or an overflow signal when the
    /// page lies past the end of the catalogue.
    async fn list_page(&self, request: PageRequest) -> Result<PageOutcome<Store>, Error>;

    /// A store and its reviews, looked up by slug.
    async fn store_by_slug(&self, slug: &str) -> Result<StoreDetail, Error>;

    /// Tag occurrence counts, most used first.
    async fn tag_counts(&self) -> Result<Vec<TagCount>, Error>;

    /// Tag facets plus the stores carrying `tag`, or every store that has
    /// any tag when `tag` is `None`.
    async fn stores_by_tag(&self, tag: Option<String>) -> Result<TagBrowse, Error>;

    /// Up to five stores ranked by text relevance.
    async fn search(&self, query: &str) -> Result<Vec<ScoredStore>, Error>;

    /// Up to ten stores within 10 km of `origin`, nearest first.
    async fn nearby(&self, origin: GeoPoint) -> Result<Vec<StoreSummary>, Error>;

    /// Stores with at least two reviews, ranked by average rating.
    async fn top_stores(&self, limit: usize) -> Result<Vec<TopStore>, Error>;
}
