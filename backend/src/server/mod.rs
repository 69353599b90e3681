//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use catalogue::Trace;
#[cfg(debug_assertions)]
use catalogue::doc::ApiDoc;
use catalogue::domain::{StoreCatalogueService, StoreRegistrationService};
use catalogue::inbound::http::configure;
use catalogue::inbound::http::health::{HealthState, live, ready};
use catalogue::inbound::http::state::HttpState;
use catalogue::outbound::memory::InMemoryDocumentStore;
use catalogue::outbound::seed::{load_seed_file, seed_store};
use catalogue::outbound::timeout::TimeoutDocumentStore;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Build the document store and services, seeding the store when configured.
///
/// # Errors
/// Returns [`std::io::Error`] when the seed fixture cannot be read or written.
pub async fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let memory = InMemoryDocumentStore::new();
    if let Some(path) = config.seed_path.as_deref() {
        let catalogue = load_seed_file(path).map_err(std::io::Error::other)?;
        seed_store(&memory, &catalogue)
            .await
            .map_err(std::io::Error::other)?;
    }

    let store = Arc::new(TimeoutDocumentStore::new(memory, config.query_timeout));
    let catalogue = StoreCatalogueService::new(Arc::clone(&store));
    let registration = StoreRegistrationService::new(store, Arc::new(DefaultClock))
        .with_max_attempts(config.slug_retry_attempts);

    Ok(HttpState::new(Arc::new(catalogue), Arc::new(registration))
        .with_page_size(config.page_size)
        .with_top_stores_limit(config.top_stores_limit))
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when seeding, binding the socket or starting
/// the server fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config).await?);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr())?
    .run();

    info!(bind_addr = %config.bind_addr(), "catalogue server listening");
    health_state.mark_ready();
    Ok(server)
}
