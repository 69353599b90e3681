//! Store entity and the read-side views built from it.
//!
//! A [`Store`] is stored as a JSON document shaped like:
//!
//! ```json
//! {
//!   "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
//!   "name": "Cafe",
//!   "slug": "cafe",
//!   "description": "Espresso and cake",
//!   "tags": ["Wifi"],
//!   "created": "2024-05-01T09:00:00Z",
//!   "location": { "type": "Point", "coordinates": [-3.19, 55.95], "address": "1 High St" },
//!   "photo": "cafe.jpg",
//!   "authorId": "0f9b5a0e-3f7b-4a54-9d3b-cc6fd1b1b3b4"
//! }
//! ```
//!
//! Reviews are never embedded; views such as [`StoreDetail`] and
//! [`TopStore`] attach them at query time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geo::GeoPoint;
use super::review::Review;
use super::validation::{
    CatalogueValidationError, normalise_tags, trimmed_non_empty, trimmed_optional, validate_slug,
};

/// GeoJSON geometry tag; stores only ever hold points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    #[default]
    Point,
}

/// Store location: a GeoJSON point plus a postal address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(rename = "type", default)]
    kind: GeometryKind,
    coordinates: GeoPoint,
    address: String,
}

impl Location {
    /// Build a location, rejecting a blank address.
    pub fn new(
        coordinates: GeoPoint,
        address: impl AsRef<str>,
    ) -> Result<Self, CatalogueValidationError> {
        let address = trimmed_non_empty(address.as_ref(), "location.address")?;
        Ok(Self {
            kind: GeometryKind::Point,
            coordinates,
            address,
        })
    }

    pub fn coordinates(&self) -> GeoPoint {
        self.coordinates
    }

    pub fn address(&self) -> &str {
        self.address.as_str()
    }
}

/// Input payload for [`Store::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDraft {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created: DateTime<Utc>,
    pub location: Location,
    #[serde(default)]
    pub photo: Option<String>,
    pub author_id: Uuid,
}

/// A listed business.
///
/// ## Invariants
/// - `name` is trimmed and non-empty.
/// - `slug` is a valid slug (lowercase ASCII letters, digits, single
///   hyphens).
/// - `tags` hold no blanks or repeats.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    id: Uuid,
    name: String,
    slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    tags: Vec<String>,
    created: DateTime<Utc>,
    location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo: Option<String>,
    author_id: Uuid,
}

impl Store {
    /// Validate and construct a store.
    pub fn new(draft: StoreDraft) -> Result<Self, CatalogueValidationError> {
        Self::try_from(draft)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
    pub fn slug(&self) -> &str {
        self.slug.as_str()
    }
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
    pub fn tags(&self) -> &[String] {
        self.tags.as_slice()
    }
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }
    pub fn location(&self) -> &Location {
        &self.location
    }
    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }
    pub fn author_id(&self) -> Uuid {
        self.author_id
    }
}

impl TryFrom<StoreDraft> for Store {
    type Error = CatalogueValidationError;

    fn try_from(draft: StoreDraft) -> Result<Self, Self::Error> {
        let name = trimmed_non_empty(&draft.name, "name")?;
        let slug = validate_slug(draft.slug, "slug")?;
        Ok(Self {
            id: draft.id,
            name,
            slug,
            description: trimmed_optional(draft.description),
            tags: normalise_tags(draft.tags),
            created: draft.created,
            location: draft.location,
            photo: trimmed_optional(draft.photo),
            author_id: draft.author_id,
        })
    }
}

impl<'de> Deserialize<'de> for Store {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        StoreDraft::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

/// The five fields returned by proximity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Projection field names for [`StoreSummary`].
pub const STORE_SUMMARY_FIELDS: [&str; 5] = ["slug", "name", "description", "location", "photo"];

/// A search hit with its text relevance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredStore {
    #[serde(flatten)]
    pub store: Store,
    pub score: f64,
}

/// A tag and the number of stores carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

/// A store that qualified for the top-stores ranking.
///
/// `average_rating` is `None` when none of the joined reviews carries a
/// rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopStore {
    #[serde(flatten)]
    pub store: Store,
    pub reviews: Vec<Review>,
    pub average_rating: Option<f64>,
}

/// A store with every review written about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDetail {
    #[serde(flatten)]
    pub store: Store,
    pub reviews: Vec<Review>,
}

/// Tag facets alongside the stores carrying the selected tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagBrowse {
    pub tags: Vec<TagCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_tag: Option<String>,
    pub stores: Vec<Store>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn draft() -> StoreDraft {
        StoreDraft {
            id: Uuid::nil(),
            name: "  Cafe  ".to_owned(),
            slug: "cafe".to_owned(),
            description: Some("  Espresso ".to_owned()),
            tags: vec!["Wifi".to_owned(), " Wifi".to_owned()],
            created: Utc
                .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
            location: Location::new(
                GeoPoint::new(-3.19, 55.95).expect("valid point"),
                "1 High St",
            )
            .expect("valid location"),
            photo: None,
            author_id: Uuid::nil(),
        }
    }

    #[rstest]
    fn normalises_fields(draft: StoreDraft) {
        let store = Store::new(draft).expect("valid store");
        assert_eq!(store.name(), "Cafe");
        assert_eq!(store.description(), Some("Espresso"));
        assert_eq!(store.tags(), ["Wifi"]);
    }

    #[rstest]
    fn rejects_blank_name(mut draft: StoreDraft) {
        draft.name = "   ".to_owned();
        assert_eq!(
            Store::new(draft),
            Err(CatalogueValidationError::EmptyField { field: "name" })
        );
    }

    #[rstest]
    fn rejects_invalid_slug(mut draft: StoreDraft) {
        draft.slug = "Cafe Bar".to_owned();
        assert_eq!(
            Store::new(draft),
            Err(CatalogueValidationError::InvalidSlug { field: "slug" })
        );
    }

    #[rstest]
    fn rejects_blank_address() {
        let point = GeoPoint::new(0.0, 0.0).expect("valid point");
        assert_eq!(
            Location::new(point, "  "),
            Err(CatalogueValidationError::EmptyField {
                field: "location.address"
            })
        );
    }

    #[rstest]
    fn serialises_as_geojson_document(draft: StoreDraft) {
        let store = Store::new(draft).expect("valid store");
        let value = serde_json::to_value(&store).expect("serialisable store");
        assert_eq!(
            value["location"],
            json!({ "type": "Point", "coordinates": [-3.19, 55.95], "address": "1 High St" })
        );
        assert_eq!(value["authorId"], json!(Uuid::nil()));
        assert!(value.get("photo").is_none());
        let back: Store = serde_json::from_value(value).expect("round trip");
        assert_eq!(back, store);
    }

    #[rstest]
    fn deserialisation_rejects_out_of_range_coordinates(draft: StoreDraft) {
        let mut value = serde_json::to_value(Store::new(draft).expect("valid store"))
            .expect("serialisable store");
        value["location"]["coordinates"] = json!([0.0, 123.0]);
        assert!(serde_json::from_value::<Store>(value).is_err());
    }

    #[rstest]
    fn scored_store_flattens_fields(draft: StoreDraft) {
        let scored = ScoredStore {
            store: Store::new(draft).expect("valid store"),
            score: 1.5,
        };
        let value = serde_json::to_value(&scored).expect("serialisable");
        assert_eq!(value["slug"], json!("cafe"));
        assert_eq!(value["score"], json!(1.5));
    }
}
