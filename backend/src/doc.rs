//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every catalogue endpoint from the inbound layer and
//! the schema wrappers in [`crate::inbound::http::schemas`], which describe
//! domain types without coupling them to utoipa.
//!
//! The generated specification is served by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, LocationSchema, ReviewSchema, ScoredStoreSchema,
    StoreDetailSchema, StoreSchema, StoreSubmissionSchema, StoreSummarySchema, TagBrowseSchema,
    TagCountSchema, TopStoreSchema,
};
use crate::inbound::http::stores::StorePageResponse;
use utoipa::OpenApi;

/// OpenAPI document for the catalogue API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Store catalogue API",
        description = "Browse, search, rank and register stores in a local business directory."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::stores::list_stores,
        crate::inbound::http::stores::list_stores_page,
        crate::inbound::http::stores::get_store,
        crate::inbound::http::stores::list_tags,
        crate::inbound::http::stores::get_tag,
        crate::inbound::http::stores::top_stores,
        crate::inbound::http::api::search,
        crate::inbound::http::api::nearby,
        crate::inbound::http::api::create_store,
        crate::inbound::http::api::update_store,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LocationSchema,
        StoreSchema,
        ReviewSchema,
        StoreSummarySchema,
        ScoredStoreSchema,
        TagCountSchema,
        TopStoreSchema,
        StoreDetailSchema,
        TagBrowseSchema,
        StoreSubmissionSchema,
        StorePageResponse
    )),
    tags(
        (name = "stores", description = "Store listing, detail, ranking and registration"),
        (name = "tags", description = "Tag facets"),
        (name = "search", description = "Text and proximity search"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
