//! Document builders shared by catalogue service tests.

use chrono::{Duration, TimeZone, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::domain::ports::{Document, SCORE_FIELD};

fn object(value: Value) -> Document {
    match value {
        Value::Object(document) => document,
        other => panic!("expected an object, got {other}"),
    }
}

/// A valid store document created `minute` minutes after a fixed epoch.
pub(crate) fn store_document(
    name: &str,
    slug: &str,
    minute: i64,
    tags: &[&str],
    coordinates: [f64; 2],
) -> Document {
    let epoch = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid epoch");
    object(json!({
        "id": Uuid::new_v4(),
        "name": name,
        "slug": slug,
        "description": format!("{name} description"),
        "tags": tags,
        "created": epoch + Duration::minutes(minute),
        "location": {
            "type": "Point",
            "coordinates": coordinates,
            "address": "1 High Street",
        },
        "authorId": Uuid::nil(),
    }))
}

/// A store document carrying a text score, as returned by a text search.
pub(crate) fn scored_document(slug: &str, score: f64) -> Document {
    let mut document = store_document(slug, slug, 0, &[], [0.0, 0.0]);
    document.insert(SCORE_FIELD.to_owned(), json!(score));
    document
}

/// A review document for the store whose id is `store_id`.
pub(crate) fn review_document(store_id: &Value, rating: Option<u8>) -> Document {
    object(json!({
        "id": Uuid::new_v4(),
        "text": "Lovely",
        "created": "2024-02-01T12:00:00Z",
        "authorId": Uuid::nil(),
        "rating": rating,
        "storeId": store_id,
    }))
}

/// A store document with the given ratings already joined under `reviews`.
pub(crate) fn joined_document(slug: &str, ratings: &[Option<u8>]) -> Document {
    let mut document = store_document(slug, slug, 0, &[], [0.0, 0.0]);
    let store_id = document.get("id").cloned().unwrap_or(Value::Null);
    let reviews = ratings
        .iter()
        .map(|rating| Value::Object(review_document(&store_id, *rating)))
        .collect();
    document.insert("reviews".to_owned(), Value::Array(reviews));
    document
}
