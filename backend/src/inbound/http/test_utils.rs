//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::domain::ports::{MockStoreCatalogueQuery, MockStoreRegistrationCommand};
use crate::domain::{GeoPoint, Location, Store, StoreDraft};
use crate::inbound::http::state::HttpState;

/// A valid store with the given slug.
pub fn sample_store(name: &str, slug: &str) -> Store {
    let coordinates = GeoPoint::new(-3.19, 55.95).expect("valid point");
    Store::new(StoreDraft {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        slug: slug.to_owned(),
        description: None,
        tags: vec!["Wifi".to_owned()],
        created: Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp"),
        location: Location::new(coordinates, "1 High Street").expect("valid location"),
        photo: None,
        author_id: Uuid::nil(),
    })
    .expect("valid store")
}

/// Handler state backed by mocks; unused ports carry no expectations.
pub fn mock_state(
    catalogue: MockStoreCatalogueQuery,
    registration: MockStoreRegistrationCommand,
) -> HttpState {
    HttpState::new(Arc::new(catalogue), Arc::new(registration))
}
