//! HTTP inbound adapter exposing the catalogue as JSON endpoints.

pub mod api;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod stores;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::{error::JsonPayloadError, web};
use serde_json::json;

use crate::domain::Error;

pub use error::ApiResult;

fn json_error(err: JsonPayloadError) -> Error {
    Error::invalid_request(format!("invalid JSON body: {err}"))
        .with_details(json!({ "field": "body" }))
}

/// Register every catalogue route plus the JSON body error handler.
///
/// Health probes are registered separately because they read
/// [`health::HealthState`] rather than [`state::HttpState`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| json_error(err).into()))
        .service(stores::list_stores)
        .service(stores::list_stores_page)
        .service(stores::get_store)
        .service(stores::list_tags)
        .service(stores::get_tag)
        .service(stores::top_stores)
        .service(api::search)
        .service(api::nearby)
        .service(api::create_store)
        .service(api::update_store);
}
