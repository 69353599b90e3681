//! Bounded nearest-neighbour search.

use std::sync::Arc;

use tracing::debug;

use super::documents::{decode_all, map_store_error};
use crate::domain::ports::{Collection, DocumentStore, Filter, FindQuery};
use crate::domain::{Error, GeoPoint, STORE_SUMMARY_FIELDS, StoreSummary};

/// Search radius around the origin, in metres.
pub const NEARBY_RADIUS_METRES: f64 = 10_000.0;
/// Maximum number of nearby stores returned.
pub const NEARBY_RESULT_LIMIT: usize = 10;

/// Finds the stores closest to a point.
pub struct GeoProximityFinder<S> {
    store: Arc<S>,
}

impl<S> Clone for GeoProximityFinder<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> GeoProximityFinder<S>
where
    S: DocumentStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Up to [`NEARBY_RESULT_LIMIT`] stores within
    /// [`NEARBY_RADIUS_METRES`] of `origin`, nearest first.
    pub async fn nearby(&self, origin: GeoPoint) -> Result<Vec<StoreSummary>, Error> {
        let find = FindQuery::new(Filter::near("location", origin, NEARBY_RADIUS_METRES))
            .projection(STORE_SUMMARY_FIELDS)
            .limit(NEARBY_RESULT_LIMIT as u64);
        let documents = self
            .store
            .find(Collection::Stores, &find)
            .await
            .map_err(map_store_error)?;
        let mut stores: Vec<StoreSummary> = decode_all(Collection::Stores, documents)?;
        stores.sort_by(|a, b| {
            let da = origin.distance_metres(&a.location.coordinates());
            let db = origin.distance_metres(&b.location.coordinates());
            da.total_cmp(&db)
        });
        stores.truncate(NEARBY_RESULT_LIMIT);
        debug!(
            lng = origin.longitude(),
            lat = origin.latitude(),
            found = stores.len(),
            "proximity search complete"
        );
        Ok(stores)
    }
}
