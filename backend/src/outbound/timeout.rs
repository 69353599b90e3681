//! Deadline decorator for any [`DocumentStore`].
//!
//! Every call is bounded by the configured query timeout; an elapsed call is
//! reported as [`DocumentStoreError::Timeout`] naming the operation, which
//! the domain surfaces as `service_unavailable`.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{
    Collection, Document, DocumentStore, DocumentStoreError, Filter, FindQuery, PipelineStage,
};

/// Wraps a store so no call outlives `deadline`.
#[derive(Debug)]
pub struct TimeoutDocumentStore<S> {
    inner: S,
    deadline: Duration,
}

impl<S> TimeoutDocumentStore<S> {
    pub fn new(inner: S, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn bounded<T, F>(
        &self,
        operation: &'static str,
        collection: Collection,
        call: F,
    ) -> Result<T, DocumentStoreError>
    where
        F: Future<Output = Result<T, DocumentStoreError>> + Send,
    {
        match timeout(self.deadline, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    %collection,
                    deadline_ms = self.deadline.as_millis(),
                    "document store call timed out"
                );
                Err(DocumentStoreError::timeout(operation))
            }
        }
    }
}

#[async_trait]
impl<S> DocumentStore for TimeoutDocumentStore<S>
where
    S: DocumentStore,
{
    async fn find(
        &self,
        collection: Collection,
        query: &FindQuery,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        self.bounded("find", collection, self.inner.find(collection, query))
            .await
    }

    async fn aggregate(
        &self,
        collection: Collection,
        pipeline: &[PipelineStage],
    ) -> Result<Vec<Document>, DocumentStoreError> {
        self.bounded(
            "aggregate",
            collection,
            self.inner.aggregate(collection, pipeline),
        )
        .await
    }

    async fn count(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<u64, DocumentStoreError> {
        self.bounded("count", collection, self.inner.count(collection, filter))
            .await
    }

    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<(), DocumentStoreError> {
        self.bounded("insert", collection, self.inner.insert(collection, document))
            .await
    }

    async fn replace(
        &self,
        collection: Collection,
        id: Uuid,
        document: Document,
    ) -> Result<bool, DocumentStoreError> {
        self.bounded(
            "replace",
            collection,
            self.inner.replace(collection, id, document),
        )
        .await
    }
}
