//! JSON API endpoints for search, proximity and store writes.
//!
//! ```text
//! GET  /api/v1/search?q=
//! GET  /api/stores/near/v1?lng=&lat=
//! POST /api/v1/stores
//! PUT  /api/v1/stores/{id}
//! ```

use actix_web::{HttpResponse, get, http::header, post, put, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ports::StoreSubmission;
use crate::domain::{ScoredStore, Store, StoreSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    ErrorSchema, ScoredStoreSchema, StoreSchema, StoreSubmissionSchema, StoreSummarySchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{STORE_ID, parse_point, parse_uuid};

/// Path of a store's detail resource.
pub fn store_location(store: &Store) -> String {
    format!("/store/{}", store.slug())
}

/// Query string for text search.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Words to search for; blank or missing returns no results.
    pub q: Option<String>,
}

/// Query string for proximity search.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NearQuery {
    /// Longitude in degrees, -180 to 180.
    pub lng: Option<String>,
    /// Latitude in degrees, -90 to 90.
    pub lat: Option<String>,
}

/// Up to five stores ranked by text relevance.
#[utoipa::path(
    get,
    path = "/api/v1/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search hits, most relevant first", body = Vec<ScoredStoreSchema>),
        (status = 503, description = "Document store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["search"],
    operation_id = "searchStores"
)]
#[get("/api/v1/search")]
pub async fn search(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<ScoredStore>>> {
    let text = query.into_inner().q.unwrap_or_default();
    Ok(web::Json(state.catalogue.search(&text).await?))
}

/// Up to ten stores within 10 km, nearest first.
#[utoipa::path(
    get,
    path = "/api/stores/near/v1",
    params(NearQuery),
    responses(
        (status = 200, description = "Nearby stores", body = Vec<StoreSummarySchema>),
        (status = 400, description = "Missing or out-of-range coordinates", body = ErrorSchema),
        (status = 503, description = "Document store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["search"],
    operation_id = "nearbyStores"
)]
#[get("/api/stores/near/v1")]
pub async fn nearby(
    state: web::Data<HttpState>,
    query: web::Query<NearQuery>,
) -> ApiResult<web::Json<Vec<StoreSummary>>> {
    let NearQuery { lng, lat } = query.into_inner();
    let origin = parse_point(lng.as_deref(), lat.as_deref())?;
    Ok(web::Json(state.catalogue.nearby(origin).await?))
}

/// Register a store; the slug is derived from its name.
#[utoipa::path(
    post,
    path = "/api/v1/stores",
    request_body = StoreSubmissionSchema,
    responses(
        (
            status = 201,
            description = "Store created",
            headers(("Location" = String, description = "Store detail path")),
            body = StoreSchema
        ),
        (status = 400, description = "Invalid submission", body = ErrorSchema),
        (status = 409, description = "No unique slug could be assigned", body = ErrorSchema),
        (status = 503, description = "Document store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["stores"],
    operation_id = "createStore"
)]
#[post("/api/v1/stores")]
pub async fn create_store(
    state: web::Data<HttpState>,
    payload: web::Json<StoreSubmission>,
) -> ApiResult<HttpResponse> {
    let store = state.registration.create_store(payload.into_inner()).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, store_location(&store)))
        .json(store))
}

/// Edit a store; renaming it re-derives the slug.
#[utoipa::path(
    put,
    path = "/api/v1/stores/{id}",
    params(("id" = String, Path, description = "Store identifier (UUID)")),
    request_body = StoreSubmissionSchema,
    responses(
        (status = 200, description = "Store updated", body = StoreSchema),
        (status = 400, description = "Invalid submission or identifier", body = ErrorSchema),
        (status = 404, description = "Unknown store", body = ErrorSchema),
        (status = 409, description = "No unique slug could be assigned", body = ErrorSchema),
        (status = 503, description = "Document store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["stores"],
    operation_id = "updateStore"
)]
#[put("/api/v1/stores/{id}")]
pub async fn update_store(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<StoreSubmission>,
) -> ApiResult<web::Json<Store>> {
    let id = parse_uuid(&path.into_inner(), STORE_ID)?;
    let store = state
        .registration
        .update_store(id, payload.into_inner())
        .await?;
    Ok(web::Json(store))
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
