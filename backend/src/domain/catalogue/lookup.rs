//! Single-store and per-tag lookups.

use std::sync::Arc;

use serde_json::json;

use super::documents::{decode_all, decode_joined, map_store_error, reviews_lookup};
use crate::domain::ports::{Collection, DocumentStore, Filter, FindQuery, PipelineStage, SortKey};
use crate::domain::{Error, Store, StoreDetail};

/// Reads individual stores and tag selections.
pub struct StoreLookup<S> {
    store: Arc<S>,
}

impl<S> Clone for StoreLookup<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> StoreLookup<S>
where
    S: DocumentStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The store with `slug`, with its reviews joined at read time.
    pub async fn by_slug(&self, slug: &str) -> Result<StoreDetail, Error> {
        let pipeline = [
            PipelineStage::Match(Filter::eq("slug", slug)),
            reviews_lookup(),
            PipelineStage::Limit(1),
        ];
        let row = self
            .store
            .aggregate(Collection::Stores, &pipeline)
            .await
            .map_err(map_store_error)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::not_found(format!("store {slug} not found"))
                    .with_details(json!({ "slug": slug }))
            })?;
        let (store, reviews) = decode_joined(row)?;
        Ok(StoreDetail { store, reviews })
    }

    /// Stores carrying `tag`, or every store holding a `tags` field (empty
    /// or not) when no tag is given. Ordered by name.
    pub async fn tagged(&self, tag: Option<&str>) -> Result<Vec<Store>, Error> {
        let filter = match tag {
            Some(tag) => Filter::contains("tags", tag),
            None => Filter::exists("tags"),
        };
        let find = FindQuery::new(filter).sort(vec![SortKey::ascending("name")]);
        let documents = self
            .store
            .find(Collection::Stores, &find)
            .await
            .map_err(map_store_error)?;
        decode_all(Collection::Stores, documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::catalogue::test_support::joined_document;
    use crate::domain::ports::MockDocumentStore;

    #[tokio::test]
    async fn by_slug_joins_reviews() {
        let mut store = MockDocumentStore::new();
        store
            .expect_aggregate()
            .withf(|_, pipeline| {
                pipeline.first() == Some(&PipelineStage::Match(Filter::eq("slug", "cafe")))
                    && pipeline.len() == 3
            })
            .return_once(|_, _| Ok(vec![joined_document("cafe", &[Some(5), None])]));
        let lookup = StoreLookup::new(Arc::new(store));

        let detail = lookup.by_slug("cafe").await.expect("store detail");

        assert_eq!(detail.store.slug(), "cafe");
        assert_eq!(detail.reviews.len(), 2);
    }

    #[tokio::test]
    async fn missing_slug_is_not_found() {
        let mut store = MockDocumentStore::new();
        store.expect_aggregate().return_once(|_, _| Ok(Vec::new()));
        let lookup = StoreLookup::new(Arc::new(store));
        let error = lookup.by_slug("nowhere").await.expect_err("missing store");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn tag_selection_filters_on_membership() {
        let mut store = MockDocumentStore::new();
        store
            .expect_find()
            .withf(|_, query| query.filter() == &Filter::contains("tags", "Wifi"))
            .times(1)
            .return_once(|_, _| Ok(Vec::new()));
        let lookup = StoreLookup::new(Arc::new(store));
        assert!(lookup.tagged(Some("Wifi")).await.expect("tagged").is_empty());
    }

    #[tokio::test]
    async fn no_tag_selects_tagged_stores() {
        let mut store = MockDocumentStore::new();
        store
            .expect_find()
            .withf(|_, query| query.filter() == &Filter::exists("tags"))
            .times(1)
            .return_once(|_, _| Ok(Vec::new()));
        let lookup = StoreLookup::new(Arc::new(store));
        lookup.tagged(None).await.expect("tagged");
    }
}
