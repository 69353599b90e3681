//! Relevance-ranked keyword search over store names and descriptions.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::documents::{decode, map_store_error};
use crate::domain::ports::{
    Collection, Document, DocumentStore, Filter, FindQuery, SCORE_FIELD, SortKey,
};
use crate::domain::{Error, ScoredStore};

/// Maximum number of search hits returned.
pub const SEARCH_RESULT_LIMIT: usize = 5;

/// Runs text-index queries and returns the best hits, most relevant first.
///
/// A blank query returns no hits without touching the store.
pub struct TextSearchRanker<S> {
    store: Arc<S>,
}

impl<S> Clone for TextSearchRanker<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> TextSearchRanker<S>
where
    S: DocumentStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<ScoredStore>, Error> {
        let query = query.trim();
        if query.is_empty() {
            debug!("blank search query");
            return Ok(Vec::new());
        }
        let find = FindQuery::new(Filter::text(query))
            .with_text_score()
            .sort(vec![SortKey::TextScore])
            .limit(SEARCH_RESULT_LIMIT as u64);
        let documents = self
            .store
            .find(Collection::Stores, &find)
            .await
            .map_err(map_store_error)?;
        let mut hits = documents
            .into_iter()
            .map(scored_store)
            .collect::<Result<Vec<_>, _>>()?;
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(SEARCH_RESULT_LIMIT);
        debug!(%query, hits = hits.len(), "text search complete");
        Ok(hits)
    }
}

fn scored_store(mut document: Document) -> Result<ScoredStore, Error> {
    let score = document
        .remove(SCORE_FIELD)
        .as_ref()
        .and_then(Value::as_f64)
        .ok_or_else(|| Error::internal("search hit is missing its relevance score"))?;
    let store = decode(Collection::Stores, document)?;
    Ok(ScoredStore { store, score })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::catalogue::test_support::{scored_document, store_document};
    use crate::domain::ports::MockDocumentStore;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    #[tokio::test]
    async fn blank_queries_return_nothing_without_a_store_call(#[case] query: &str) {
        let mut store = MockDocumentStore::new();
        store.expect_find().times(0);
        let ranker = TextSearchRanker::new(Arc::new(store));
        assert!(ranker.search(query).await.expect("search").is_empty());
    }

    #[tokio::test]
    async fn asks_for_scored_text_matches_capped_at_five() {
        let mut store = MockDocumentStore::new();
        store
            .expect_find()
            .withf(|collection, query| {
                *collection == Collection::Stores
                    && query.filter() == &Filter::text("coffee")
                    && query.wants_text_score()
                    && query.sort_keys() == [SortKey::TextScore]
                    && query.limit_value() == Some(5)
            })
            .times(1)
            .return_once(|_, _| Ok(Vec::new()));
        let ranker = TextSearchRanker::new(Arc::new(store));
        ranker.search("  coffee ").await.expect("search");
    }

    #[tokio::test]
    async fn orders_hits_by_descending_score_and_truncates() {
        let mut store = MockDocumentStore::new();
        store.expect_find().return_once(|_, _| {
            Ok(vec![
                scored_document("a", 0.5),
                scored_document("b", 2.0),
                scored_document("c", 1.0),
                scored_document("d", 1.5),
                scored_document("e", 0.75),
                scored_document("f", 3.0),
            ])
        });
        let ranker = TextSearchRanker::new(Arc::new(store));

        let hits = ranker.search("coffee").await.expect("search");

        let slugs: Vec<&str> = hits.iter().map(|hit| hit.store.slug()).collect();
        assert_eq!(slugs, ["f", "b", "d", "c", "e"]);
        assert!(hits.windows(2).all(|pair| match pair {
            [first, second] => first.score >= second.score,
            _ => true,
        }));
    }

    #[tokio::test]
    async fn hits_without_scores_are_internal_errors() {
        let mut store = MockDocumentStore::new();
        store
            .expect_find()
            .return_once(|_, _| Ok(vec![store_document("a", "a", 0, &[], [0.0, 0.0])]));
        let ranker = TextSearchRanker::new(Arc::new(store));
        let error = ranker.search("a").await.expect_err("missing score");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
