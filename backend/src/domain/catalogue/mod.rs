//! Catalogue query and ranking services.
//!
//! Each read operation lives in its own component so it can be tested
//! against a mocked [`DocumentStore`]:
//!
//! - [`SlugResolver`]: unique slug assignment for store names.
//! - [`TagFacetCounter`]: tag occurrence counts.
//! - [`TextSearchRanker`]: relevance-ranked keyword search.
//! - [`GeoProximityFinder`]: bounded nearest-neighbour search.
//! - [`RatingAggregator`]: review join and top-store ranking.
//! - [`PaginatedCatalogueLister`]: page listing with overflow detection.
//!
//! [`StoreCatalogueService`] composes them behind the
//! [`StoreCatalogueQuery`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join;
use pagination::{PageOutcome, PageRequest};

use crate::domain::ports::{DocumentStore, StoreCatalogueQuery};
use crate::domain::{
    Error, GeoPoint, ScoredStore, Store, StoreDetail, StoreSummary, TagBrowse, TagCount, TopStore,
};

pub(crate) mod documents;
mod geo_proximity;
mod listing;
mod lookup;
mod rating_aggregator;
mod slug_resolver;
mod tag_facets;
mod text_search;

#[cfg(test)]
pub(crate) mod test_support;

pub use geo_proximity::{GeoProximityFinder, NEARBY_RADIUS_METRES, NEARBY_RESULT_LIMIT};
pub use listing::PaginatedCatalogueLister;
pub use lookup::StoreLookup;
pub use rating_aggregator::{MIN_REVIEWS_FOR_RANKING, RatingAggregator, TOP_STORES_DEFAULT_LIMIT};
pub use slug_resolver::SlugResolver;
pub use tag_facets::TagFacetCounter;
pub use text_search::{SEARCH_RESULT_LIMIT, TextSearchRanker};

/// Read-side catalogue service backed by a [`DocumentStore`].
pub struct StoreCatalogueService<S> {
    facets: TagFacetCounter<S>,
    search: TextSearchRanker<S>,
    proximity: GeoProximityFinder<S>,
    ratings: RatingAggregator<S>,
    lister: PaginatedCatalogueLister<S>,
    lookup: StoreLookup<S>,
}

impl<S> Clone for StoreCatalogueService<S> {
    fn clone(&self) -> Self {
        Self {
            facets: self.facets.clone(),
            search: self.search.clone(),
            proximity: self.proximity.clone(),
            ratings: self.ratings.clone(),
            lister: self.lister.clone(),
            lookup: self.lookup.clone(),
        }
    }
}

impl<S> StoreCatalogueService<S>
where
    S: DocumentStore,
{
    /// Build every component over the same store handle.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            facets: TagFacetCounter::new(Arc::clone(&store)),
            search: TextSearchRanker::new(Arc::clone(&store)),
            proximity: GeoProximityFinder::new(Arc::clone(&store)),
            ratings: RatingAggregator::new(Arc::clone(&store)),
            lister: PaginatedCatalogueLister::new(Arc::clone(&store)),
            lookup: StoreLookup::new(store),
        }
    }
}

#[async_trait]
impl<S> StoreCatalogueQuery for StoreCatalogueService<S>
where
    S: DocumentStore,
{
    async fn list_page(&self, request: PageRequest) -> Result<PageOutcome<Store>, Error> {
        self.lister.list_page(request).await
    }

    async fn store_by_slug(&self, slug: &str) -> Result<StoreDetail, Error> {
        self.lookup.by_slug(slug).await
    }

    async fn tag_counts(&self) -> Result<Vec<TagCount>, Error> {
        self.facets.tag_counts().await
    }

    async fn stores_by_tag(&self, tag: Option<String>) -> Result<TagBrowse, Error> {
        let selected_tag = tag
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        let (tags, stores) = try_join(
            self.facets.tag_counts(),
            self.lookup.tagged(selected_tag.as_deref()),
        )
        .await?;
        Ok(TagBrowse {
            tags,
            selected_tag,
            stores,
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<ScoredStore>, Error> {
        self.search.search(query).await
    }

    async fn nearby(&self, origin: GeoPoint) -> Result<Vec<StoreSummary>, Error> {
        self.proximity.nearby(origin).await
    }

    async fn top_stores(&self, limit: usize) -> Result<Vec<TopStore>, Error> {
        self.ratings.top_stores(limit).await
    }
}
