//! Catalogue browsing endpoints.
//!
//! ```text
//! GET /stores
//! GET /stores/page/{page}
//! GET /store/{slug}
//! GET /tags
//! GET /tags/{tag}
//! GET /top
//! ```

use actix_web::{HttpResponse, get, http::header, web};
use pagination::{Page, PageOutcome, PageRequest};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{Store, StoreDetail, TagBrowse, TopStore};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    ErrorSchema, StoreDetailSchema, StoreSchema, TagBrowseSchema, TopStoreSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_page;

/// One page of the store listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorePageResponse {
    /// Stores on this page, newest first.
    #[schema(value_type = Vec<StoreSchema>)]
    pub stores: Vec<Store>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 4)]
    pub page_size: u64,
    #[schema(example = 13)]
    pub total_count: u64,
    #[schema(example = 4)]
    pub total_pages: u64,
}

impl From<Page<Store>> for StorePageResponse {
    fn from(page: Page<Store>) -> Self {
        let (number, page_size, total_count, total_pages) = (
            page.page(),
            page.page_size(),
            page.total_count(),
            page.total_pages(),
        );
        Self {
            stores: page.into_items(),
            page: number,
            page_size,
            total_count,
            total_pages,
        }
    }
}

/// Path of a listing page, used for overflow redirects.
pub fn page_location(page: u64) -> String {
    format!("/stores/page/{page}")
}

async fn render_page(state: &HttpState, request: PageRequest) -> ApiResult<HttpResponse> {
    match state.catalogue.list_page(request).await? {
        PageOutcome::Page(page) => Ok(HttpResponse::Ok().json(StorePageResponse::from(page))),
        PageOutcome::Overflow {
            requested_page,
            target_page,
        } => {
            debug!(requested_page, target_page, "redirecting past-the-end page");
            Ok(HttpResponse::Found()
                .insert_header((header::LOCATION, page_location(target_page)))
                .finish())
        }
    }
}

/// First page of the store listing.
#[utoipa::path(
    get,
    path = "/stores",
    responses(
        (status = 200, description = "First page of stores", body = StorePageResponse),
        (status = 503, description = "Document store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["stores"],
    operation_id = "listStores"
)]
#[get("/stores")]
pub async fn list_stores(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let request = parse_page("1", state.page_size)?;
    render_page(&state, request).await
}

/// A numbered page of the store listing.
///
/// Pages past the end redirect to the last page holding stores.
#[utoipa::path(
    get,
    path = "/stores/page/{page}",
    params(("page" = u64, Path, description = "Page number, starting at 1")),
    responses(
        (status = 200, description = "Page of stores", body = StorePageResponse),
        (
            status = 302,
            description = "Page lies past the end of the catalogue",
            headers(("Location" = String, description = "Last page holding stores"))
        ),
        (status = 400, description = "Invalid page number", body = ErrorSchema),
        (status = 503, description = "Document store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["stores"],
    operation_id = "listStoresPage"
)]
#[get("/stores/page/{page}")]
pub async fn list_stores_page(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let request = parse_page(&path.into_inner(), state.page_size)?;
    render_page(&state, request).await
}

/// A store and its reviews.
#[utoipa::path(
    get,
    path = "/store/{slug}",
    params(("slug" = String, Path, description = "Store slug")),
    responses(
        (status = 200, description = "Store with reviews", body = StoreDetailSchema),
        (status = 404, description = "No store has this slug", body = ErrorSchema),
        (status = 503, description = "Document store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["stores"],
    operation_id = "getStore"
)]
#[get("/store/{slug}")]
pub async fn get_store(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<StoreDetail>> {
    let detail = state.catalogue.store_by_slug(&path.into_inner()).await?;
    Ok(web::Json(detail))
}

/// Tag facets and every tagged store.
#[utoipa::path(
    get,
    path = "/tags",
    responses(
        (status = 200, description = "Tag facets", body = TagBrowseSchema),
        (status = 503, description = "Document store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "listTags"
)]
#[get("/tags")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<TagBrowse>> {
    Ok(web::Json(state.catalogue.stores_by_tag(None).await?))
}

/// Tag facets and the stores carrying one tag.
#[utoipa::path(
    get,
    path = "/tags/{tag}",
    params(("tag" = String, Path, description = "Selected tag")),
    responses(
        (status = 200, description = "Tag facets and matching stores", body = TagBrowseSchema),
        (status = 503, description = "Document store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "getTag"
)]
#[get("/tags/{tag}")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TagBrowse>> {
    Ok(web::Json(
        state.catalogue.stores_by_tag(Some(path.into_inner())).await?,
    ))
}

/// Stores with at least two reviews, best rated first.
#[utoipa::path(
    get,
    path = "/top",
    responses(
        (status = 200, description = "Top stores", body = Vec<TopStoreSchema>),
        (status = 503, description = "Document store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["stores"],
    operation_id = "getTopStores"
)]
#[get("/top")]
pub async fn top_stores(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TopStore>>> {
    Ok(web::Json(
        state.catalogue.top_stores(state.top_stores_limit).await?,
    ))
}

#[cfg(test)]
#[path = "stores_tests.rs"]
mod tests;
