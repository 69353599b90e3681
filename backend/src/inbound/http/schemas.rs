//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

#![expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]

use serde::Serialize;
use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested store does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A unique slug could not be assigned.
    #[schema(rename = "conflict")]
    Conflict,
    /// The document store timed out or was unreachable; retry later.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Error)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "name must not be empty")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Location`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Location)]
pub struct LocationSchema {
    /// GeoJSON geometry type; always `Point`.
    #[serde(rename = "type")]
    #[schema(example = "Point")]
    kind: String,
    /// `[longitude, latitude]` in degrees.
    #[schema(example = json!([-3.19, 55.95]))]
    coordinates: [f64; 2],
    #[schema(example = "1 High Street")]
    address: String,
}

/// OpenAPI schema for [`crate::domain::Store`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Store)]
#[serde(rename_all = "camelCase")]
pub struct StoreSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(example = "Cafe")]
    name: String,
    /// URL-safe identifier, unique across the catalogue.
    #[schema(example = "cafe-2")]
    slug: String,
    description: Option<String>,
    #[schema(example = json!(["Wifi", "Vegan"]))]
    tags: Vec<String>,
    #[schema(value_type = String, format = DateTime)]
    created: String,
    location: LocationSchema,
    photo: Option<String>,
    #[schema(value_type = String, format = Uuid)]
    author_id: String,
}

/// OpenAPI schema for [`crate::domain::Review`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Review)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    text: String,
    #[schema(value_type = String, format = DateTime)]
    created: String,
    #[schema(value_type = String, format = Uuid)]
    author_id: String,
    /// Star rating from 1 to 5.
    #[schema(minimum = 1, maximum = 5)]
    rating: Option<u8>,
    #[schema(value_type = String, format = Uuid)]
    store_id: String,
}

/// OpenAPI schema for [`crate::domain::StoreSummary`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::StoreSummary)]
pub struct StoreSummarySchema {
    slug: String,
    name: String,
    description: Option<String>,
    location: LocationSchema,
    photo: Option<String>,
}

/// OpenAPI schema for [`crate::domain::ScoredStore`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::ScoredStore)]
pub struct ScoredStoreSchema {
    #[serde(flatten)]
    store: StoreSchema,
    /// Text relevance; higher is more relevant.
    score: f64,
}

/// OpenAPI schema for [`crate::domain::TagCount`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::TagCount)]
pub struct TagCountSchema {
    #[schema(example = "Wifi")]
    tag: String,
    #[schema(example = 3)]
    count: u64,
}

/// OpenAPI schema for [`crate::domain::TopStore`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::TopStore)]
#[serde(rename_all = "camelCase")]
pub struct TopStoreSchema {
    #[serde(flatten)]
    store: StoreSchema,
    reviews: Vec<ReviewSchema>,
    /// Mean of the rated reviews; absent when none carry a rating.
    #[schema(example = 4.5)]
    average_rating: Option<f64>,
}

/// OpenAPI schema for [`crate::domain::StoreDetail`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::StoreDetail)]
pub struct StoreDetailSchema {
    #[serde(flatten)]
    store: StoreSchema,
    reviews: Vec<ReviewSchema>,
}

/// OpenAPI schema for [`crate::domain::TagBrowse`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::TagBrowse)]
#[serde(rename_all = "camelCase")]
pub struct TagBrowseSchema {
    tags: Vec<TagCountSchema>,
    selected_tag: Option<String>,
    stores: Vec<StoreSchema>,
}

/// OpenAPI schema for [`crate::domain::ports::StoreSubmission`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::ports::StoreSubmission)]
#[serde(rename_all = "camelCase")]
pub struct StoreSubmissionSchema {
    #[schema(example = "Cafe")]
    name: String,
    description: Option<String>,
    tags: Vec<String>,
    #[schema(example = -3.19)]
    longitude: f64,
    #[schema(example = 55.95)]
    latitude: f64,
    #[schema(example = "1 High Street")]
    address: String,
    photo: Option<String>,
    #[schema(value_type = String, format = Uuid)]
    author_id: String,
}
