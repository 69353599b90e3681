//! Top-store ranking by average review rating.
//!
//! The ranking is a chain of small steps: join reviews onto stores, keep
//! stores with enough reviews, reduce each to an average, sort, then cut to
//! the requested length. Only the join touches the document store.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use super::documents::{decode_joined, map_store_error, reviews_lookup};
use crate::domain::ports::{Collection, DocumentStore};
use crate::domain::{CatalogueValidationError, Error, Review, Store, TopStore};

/// Number of stores returned when the caller does not choose.
pub const TOP_STORES_DEFAULT_LIMIT: usize = 10;
/// Reviews a store needs before it is ranked.
pub const MIN_REVIEWS_FOR_RANKING: usize = 2;

/// Joins stores with their reviews and ranks the well-reviewed ones.
pub struct RatingAggregator<S> {
    store: Arc<S>,
}

impl<S> Clone for RatingAggregator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> RatingAggregator<S>
where
    S: DocumentStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The `limit` best-rated stores having at least
    /// [`MIN_REVIEWS_FOR_RANKING`] reviews.
    ///
    /// # Errors
    /// A zero `limit` is rejected as `invalid_request`.
    pub async fn top_stores(&self, limit: usize) -> Result<Vec<TopStore>, Error> {
        if limit == 0 {
            return Err(CatalogueValidationError::InvalidLimit { field: "limit" }.into());
        }
        let joined = self.join_reviews().await?;
        let candidates = joined.len();
        let ranked = rank(joined, limit);
        debug!(candidates, ranked = ranked.len(), limit, "ranked top stores");
        Ok(ranked)
    }

    async fn join_reviews(&self) -> Result<Vec<(Store, Vec<Review>)>, Error> {
        let rows = self
            .store
            .aggregate(Collection::Stores, &[reviews_lookup()])
            .await
            .map_err(map_store_error)?;
        rows.into_iter().map(decode_joined).collect()
    }
}

/// A store that has passed the review-count threshold.
struct QualifiedStore {
    store: Store,
    reviews: Vec<Review>,
}

impl QualifiedStore {
    fn qualify((store, reviews): (Store, Vec<Review>)) -> Option<Self> {
        (reviews.len() >= MIN_REVIEWS_FOR_RANKING).then_some(Self { store, reviews })
    }

    fn into_top_store(self) -> TopStore {
        let average_rating = average_rating(&self.reviews);
        TopStore {
            store: self.store,
            reviews: self.reviews,
            average_rating,
        }
    }
}

/// Mean of the ratings present; unrated reviews do not count.
fn average_rating(reviews: &[Review]) -> Option<f64> {
    let ratings: Vec<f64> = reviews
        .iter()
        .filter_map(Review::rating)
        .map(|rating| f64::from(rating.value()))
        .collect();
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
}

/// Highest average first; stores without any rating sort last.
fn by_average_descending(a: &TopStore, b: &TopStore) -> Ordering {
    match (a.average_rating, b.average_rating) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn rank(joined: Vec<(Store, Vec<Review>)>, limit: usize) -> Vec<TopStore> {
    let mut ranked: Vec<TopStore> = joined
        .into_iter()
        .filter_map(QualifiedStore::qualify)
        .map(QualifiedStore::into_top_store)
        .collect();
    ranked.sort_by(by_average_descending);
    ranked.truncate(limit);
    ranked
}
