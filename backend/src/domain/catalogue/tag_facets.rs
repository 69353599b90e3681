//! Tag occurrence counting.

use std::sync::Arc;

use serde_json::Value;

use super::documents::map_store_error;
use crate::domain::ports::{
    Collection, Document, DocumentStore, GROUP_COUNT_FIELD, GROUP_KEY_FIELD, PipelineStage,
    SortKey,
};
use crate::domain::{Error, TagCount};

/// Counts how many stores carry each tag.
pub struct TagFacetCounter<S> {
    store: Arc<S>,
}

impl<S> Clone for TagFacetCounter<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> TagFacetCounter<S>
where
    S: DocumentStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Tag counts, most used first. Ties keep the store's group order.
    pub async fn tag_counts(&self) -> Result<Vec<TagCount>, Error> {
        let rows = self
            .store
            .aggregate(Collection::Stores, &facet_pipeline())
            .await
            .map_err(map_store_error)?;
        let mut counts = rows
            .into_iter()
            .map(tag_count_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(counts)
    }
}

fn facet_pipeline() -> [PipelineStage; 3] {
    [
        PipelineStage::Unwind {
            field: "tags".to_owned(),
        },
        PipelineStage::GroupCount {
            field: "tags".to_owned(),
        },
        PipelineStage::Sort(vec![SortKey::descending(GROUP_COUNT_FIELD)]),
    ]
}

fn tag_count_from_row(row: Document) -> Result<TagCount, Error> {
    let tag = row.get(GROUP_KEY_FIELD).and_then(Value::as_str);
    let count = row.get(GROUP_COUNT_FIELD).and_then(Value::as_u64);
    match (tag, count) {
        (Some(tag), Some(count)) => Ok(TagCount {
            tag: tag.to_owned(),
            count,
        }),
        _ => Err(Error::internal(format!(
            "malformed tag facet row: {}",
            Value::Object(row)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockDocumentStore;
    use serde_json::json;

    fn row(tag: &str, count: u64) -> Document {
        let mut document = Document::new();
        document.insert(GROUP_KEY_FIELD.to_owned(), json!(tag));
        document.insert(GROUP_COUNT_FIELD.to_owned(), json!(count));
        document
    }

    #[tokio::test]
    async fn unwinds_groups_and_sorts_descending() {
        let mut store = MockDocumentStore::new();
        store
            .expect_aggregate()
            .withf(|collection, pipeline| {
                *collection == Collection::Stores && pipeline.iter().eq(facet_pipeline().iter())
            })
            .times(1)
            .return_once(|_, _| Ok(vec![row("Vegan", 1), row("Wifi", 3), row("Family", 2)]));
        let counter = TagFacetCounter::new(Arc::new(store));

        let counts = counter.tag_counts().await.expect("tag counts");

        let flattened: Vec<(&str, u64)> = counts
            .iter()
            .map(|count| (count.tag.as_str(), count.count))
            .collect();
        assert_eq!(flattened, [("Wifi", 3), ("Family", 2), ("Vegan", 1)]);
    }

    #[tokio::test]
    async fn empty_catalogue_has_no_facets() {
        let mut store = MockDocumentStore::new();
        store.expect_aggregate().return_once(|_, _| Ok(Vec::new()));
        let counter = TagFacetCounter::new(Arc::new(store));
        assert!(counter.tag_counts().await.expect("tag counts").is_empty());
    }

    #[tokio::test]
    async fn malformed_rows_are_internal_errors() {
        let mut store = MockDocumentStore::new();
        store
            .expect_aggregate()
            .return_once(|_, _| Ok(vec![Document::new()]));
        let counter = TagFacetCounter::new(Arc::new(store));
        let error = counter.tag_counts().await.expect_err("malformed row");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
