//! In-process [`DocumentStore`] adapter.
//!
//! Holds both collections behind a single [`RwLock`] so aggregation
//! pipelines that join stores to reviews see a consistent snapshot. Unique
//! indexes on `id` (both collections) and `slug` (stores) are checked under
//! the write lock.

mod matcher;
mod pipeline;
mod values;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    Collection, Document, DocumentStore, DocumentStoreError, Filter, FindQuery, PipelineStage,
};

use self::matcher::Matcher;
use self::pipeline::{CollectionSource, run_find, run_pipeline};
use self::values::lookup;

#[derive(Debug, Default)]
struct Collections {
    stores: Vec<Document>,
    reviews: Vec<Document>,
}

impl Collections {
    fn get_mut(&mut self, collection: Collection) -> &mut Vec<Document> {
        match collection {
            Collection::Stores => &mut self.stores,
            Collection::Reviews => &mut self.reviews,
        }
    }
}

impl CollectionSource for Collections {
    fn documents(&self, collection: Collection) -> &[Document] {
        match collection {
            Collection::Stores => &self.stores,
            Collection::Reviews => &self.reviews,
        }
    }
}

fn unique_fields(collection: Collection) -> &'static [&'static str] {
    match collection {
        Collection::Stores => &["id", "slug"],
        Collection::Reviews => &["id"],
    }
}

fn key_text(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), ToOwned::to_owned)
}

/// Reject `document` if it collides with any entry of `existing` on a
/// unique field. `skip` names the position being replaced.
fn check_unique(
    collection: Collection,
    existing: &[Document],
    document: &Document,
    skip: Option<usize>,
) -> Result<(), DocumentStoreError> {
    for field in unique_fields(collection) {
        let Some(value) = lookup(document, field).filter(|value| !value.is_null()) else {
            continue;
        };
        let taken = existing
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != skip)
            .any(|(_, other)| lookup(other, field) == Some(value));
        if taken {
            return Err(DocumentStoreError::duplicate_key(*field, key_text(value)));
        }
    }
    Ok(())
}

/// Document store kept entirely in memory.
///
/// # Examples
/// ```
/// use catalogue::outbound::memory::InMemoryDocumentStore;
///
/// let store = InMemoryDocumentStore::new();
/// # let _ = store;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<Collections>,
}

impl InMemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub async fn document_count(&self, collection: Collection) -> usize {
        self.collections.read().await.documents(collection).len()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find(
        &self,
        collection: Collection,
        query: &FindQuery,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let guard = self.collections.read().await;
        run_find(guard.documents(collection), query)
    }

    async fn aggregate(
        &self,
        collection: Collection,
        pipeline: &[PipelineStage],
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let guard = self.collections.read().await;
        run_pipeline(&*guard, collection, pipeline)
    }

    async fn count(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<u64, DocumentStoreError> {
        let matcher = Matcher::compile(filter)?;
        let guard = self.collections.read().await;
        let matched = guard
            .documents(collection)
            .iter()
            .filter(|document| matcher.matches(document))
            .count();
        Ok(u64::try_from(matched).unwrap_or(u64::MAX))
    }

    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<(), DocumentStoreError> {
        if lookup(&document, "id").is_none_or(Value::is_null) {
            return Err(DocumentStoreError::query(format!(
                "{collection} documents require an id"
            )));
        }
        let mut guard = self.collections.write().await;
        let documents = guard.get_mut(collection);
        check_unique(collection, documents, &document, None)?;
        documents.push(document);
        debug!(%collection, total = documents.len(), "document inserted");
        Ok(())
    }

    async fn replace(
        &self,
        collection: Collection,
        id: Uuid,
        document: Document,
    ) -> Result<bool, DocumentStoreError> {
        let target = Value::String(id.to_string());
        let mut guard = self.collections.write().await;
        let documents = guard.get_mut(collection);
        let Some(position) = documents
            .iter()
            .position(|existing| lookup(existing, "id") == Some(&target))
        else {
            return Ok(false);
        };
        check_unique(collection, documents, &document, Some(position))?;
        documents[position] = document;
        debug!(%collection, %id, "document replaced");
        Ok(true)
    }
}
