//! Tests for store registration and slug conflict retries.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Local, TimeZone};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::catalogue::test_support::store_document;
use crate::domain::ports::MockDocumentStore;

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

fn base_submission() -> StoreSubmission {
    StoreSubmission {
        name: "Cafe".to_owned(),
        description: Some(" Espresso bar ".to_owned()),
        tags: vec!["Wifi".to_owned()],
        longitude: -3.19,
        latitude: 55.95,
        address: "1 High Street".to_owned(),
        photo: None,
        author_id: Uuid::nil(),
    }
}

#[fixture]
fn submission() -> StoreSubmission {
    base_submission()
}

fn service(store: MockDocumentStore) -> StoreRegistrationService<MockDocumentStore> {
    StoreRegistrationService::new(Arc::new(store), fixture_clock())
}

fn slug_of(document: &crate::domain::ports::Document) -> Option<&str> {
    document.get("slug").and_then(Value::as_str)
}

#[rstest]
#[tokio::test]
async fn create_assigns_base_slug_and_clock_timestamp(submission: StoreSubmission) {
    let mut store = MockDocumentStore::new();
    store.expect_count().times(1).return_once(|_, _| Ok(0));
    store
        .expect_insert()
        .withf(|collection, document| {
            *collection == Collection::Stores && slug_of(document) == Some("cafe")
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let created = service(store)
        .create_store(submission)
        .await
        .expect("store created");

    assert_eq!(created.slug(), "cafe");
    assert_eq!(created.created(), fixture_timestamp());
    assert_eq!(created.description(), Some("Espresso bar"));
}

#[rstest]
#[tokio::test]
async fn create_retries_when_slug_is_claimed_concurrently(submission: StoreSubmission) {
    let counts = Arc::new(AtomicU64::new(0));
    let mut store = MockDocumentStore::new();
    let seen = Arc::clone(&counts);
    store
        .expect_count()
        .times(2)
        .returning(move |_, _| Ok(seen.fetch_add(1, Ordering::SeqCst)));
    let inserts = Arc::new(AtomicU64::new(0));
    let attempt = Arc::clone(&inserts);
    store.expect_insert().times(2).returning(move |_, document| {
        if attempt.fetch_add(1, Ordering::SeqCst) == 0 {
            let slug = slug_of(&document).unwrap_or_default().to_owned();
            Err(DocumentStoreError::duplicate_key("slug", slug))
        } else {
            Ok(())
        }
    });

    let created = service(store)
        .create_store(submission)
        .await
        .expect("store created on retry");

    assert_eq!(created.slug(), "cafe-2");
}

#[rstest]
#[tokio::test]
async fn create_gives_up_with_conflict_after_bounded_attempts(submission: StoreSubmission) {
    let mut store = MockDocumentStore::new();
    store.expect_count().times(2).returning(|_, _| Ok(0));
    store
        .expect_insert()
        .times(2)
        .returning(|_, _| Err(DocumentStoreError::duplicate_key("slug", "cafe")));

    let error = service(store)
        .with_max_attempts(2)
        .create_store(submission)
        .await
        .expect_err("conflict");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.details().map(|d| d["attempts"].clone()), Some(json!(2)));
}

#[rstest]
#[case::blank_name(StoreSubmission { name: "  ".to_owned(), ..base_submission() }, "name")]
#[case::latitude(StoreSubmission { latitude: 91.0, ..base_submission() }, "lat")]
#[case::longitude(StoreSubmission { longitude: f64::NAN, ..base_submission() }, "lng")]
#[case::address(StoreSubmission { address: String::new(), ..base_submission() }, "location.address")]
#[tokio::test]
async fn create_rejects_invalid_submissions_before_any_io(
    #[case] submission: StoreSubmission,
    #[case] field: &str,
) {
    let mut store = MockDocumentStore::new();
    store.expect_count().times(0);
    store.expect_insert().times(0);

    let error = service(store)
        .create_store(submission)
        .await
        .expect_err("invalid submission");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.details().map(|d| d["field"].clone()), Some(json!(field)));
}

#[rstest]
#[tokio::test]
async fn create_does_not_retry_timeouts(submission: StoreSubmission) {
    let mut store = MockDocumentStore::new();
    store.expect_count().times(1).return_once(|_, _| Ok(0));
    store
        .expect_insert()
        .times(1)
        .return_once(|_, _| Err(DocumentStoreError::timeout("insert")));

    let error = service(store)
        .create_store(submission)
        .await
        .expect_err("timeout");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

fn existing_cafe() -> (Uuid, crate::domain::ports::Document) {
    let document = store_document("Cafe", "cafe-2", 0, &["Wifi"], [0.0, 0.0]);
    let id = document
        .get("id")
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .expect("fixture id");
    (id, document)
}

#[rstest]
#[tokio::test]
async fn update_keeps_slug_when_name_is_unchanged(submission: StoreSubmission) {
    let (id, document) = existing_cafe();
    let mut store = MockDocumentStore::new();
    store
        .expect_find()
        .times(1)
        .return_once(move |_, _| Ok(vec![document]));
    store.expect_count().times(0);
    store
        .expect_replace()
        .withf(move |_, target, document| *target == id && slug_of(document) == Some("cafe-2"))
        .times(1)
        .return_once(|_, _, _| Ok(true));

    let updated = service(store)
        .update_store(id, StoreSubmission {
            name: " Cafe ".to_owned(),
            ..submission
        })
        .await
        .expect("store updated");

    assert_eq!(updated.slug(), "cafe-2");
    assert_ne!(updated.created(), fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn update_re_resolves_slug_on_rename_excluding_itself(submission: StoreSubmission) {
    let (id, document) = existing_cafe();
    let excluded = id.to_string();
    let mut store = MockDocumentStore::new();
    store
        .expect_find()
        .return_once(move |_, _| Ok(vec![document]));
    store
        .expect_count()
        .withf(move |_, filter| match filter {
            Filter::And(inner) => inner.contains(&Filter::ne("id", excluded.clone())),
            _ => false,
        })
        .times(1)
        .return_once(|_, _| Ok(0));
    store
        .expect_replace()
        .withf(|_, _, document| slug_of(document) == Some("tea-room"))
        .times(1)
        .return_once(|_, _, _| Ok(true));

    let updated = service(store)
        .update_store(id, StoreSubmission {
            name: "Tea Room".to_owned(),
            ..submission
        })
        .await
        .expect("store renamed");

    assert_eq!(updated.slug(), "tea-room");
    assert_eq!(updated.name(), "Tea Room");
}

#[rstest]
#[tokio::test]
async fn update_of_unknown_store_is_not_found(submission: StoreSubmission) {
    let mut store = MockDocumentStore::new();
    store.expect_find().return_once(|_, _| Ok(Vec::new()));
    store.expect_replace().times(0);

    let error = service(store)
        .update_store(Uuid::new_v4(), submission)
        .await
        .expect_err("missing store");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_of_store_deleted_mid_flight_is_not_found(submission: StoreSubmission) {
    let (id, document) = existing_cafe();
    let mut store = MockDocumentStore::new();
    store
        .expect_find()
        .return_once(move |_, _| Ok(vec![document]));
    store.expect_replace().return_once(|_, _, _| Ok(false));

    let error = service(store)
        .update_store(id, submission)
        .await
        .expect_err("vanished store");

    assert_eq!(error.code(), ErrorCode::NotFound);
}
