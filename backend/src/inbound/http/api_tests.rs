//! Tests for the JSON API handlers.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use super::*;
use crate::domain::ports::{MockStoreCatalogueQuery, MockStoreRegistrationCommand};
use crate::domain::{Error, GeoPoint};
use crate::inbound::http::configure;
use crate::inbound::http::test_utils::{mock_state, sample_store};

async fn send(state: HttpState, request: actix_test::TestRequest) -> actix_web::dev::ServiceResponse {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure),
    )
    .await;
    actix_test::call_service(&app, request.to_request()).await
}

fn submission_body() -> Value {
    json!({
        "name": "Cafe",
        "tags": ["Wifi"],
        "longitude": -3.19,
        "latitude": 55.95,
        "address": "1 High Street",
        "authorId": Uuid::nil(),
    })
}

#[rstest]
#[actix_web::test]
async fn search_passes_the_query_through() {
    let mut catalogue = MockStoreCatalogueQuery::new();
    catalogue
        .expect_search()
        .withf(|query| query == "coffee cake")
        .times(1)
        .return_once(|_| {
            Ok(vec![ScoredStore {
                store: sample_store("Cafe", "cafe"),
                score: 1.5,
            }])
        });
    let state = mock_state(catalogue, MockStoreRegistrationCommand::new());

    let response = send(
        state,
        actix_test::TestRequest::get().uri("/api/v1/search?q=coffee%20cake"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body[0]["slug"], "cafe");
    assert_eq!(body[0]["score"], 1.5);
}

#[rstest]
#[actix_web::test]
async fn search_without_query_is_blank() {
    let mut catalogue = MockStoreCatalogueQuery::new();
    catalogue
        .expect_search()
        .withf(|query| query.is_empty())
        .return_once(|_| Ok(Vec::new()));
    let state = mock_state(catalogue, MockStoreRegistrationCommand::new());

    let response = send(state, actix_test::TestRequest::get().uri("/api/v1/search")).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn nearby_parses_coordinates() {
    let expected = GeoPoint::new(-3.19, 55.95).expect("valid point");
    let mut catalogue = MockStoreCatalogueQuery::new();
    catalogue
        .expect_nearby()
        .withf(move |origin| *origin == expected)
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    let state = mock_state(catalogue, MockStoreRegistrationCommand::new());

    let response = send(
        state,
        actix_test::TestRequest::get().uri("/api/stores/near/v1?lng=-3.19&lat=55.95"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[case("/api/stores/near/v1?lat=55.95", "lng")]
#[case("/api/stores/near/v1?lng=-3.19&lat=north", "lat")]
#[case("/api/stores/near/v1?lng=-3.19&lat=91", "lat")]
#[actix_web::test]
async fn nearby_rejects_bad_coordinates(#[case] uri: &str, #[case] field: &str) {
    let mut catalogue = MockStoreCatalogueQuery::new();
    catalogue.expect_nearby().times(0);
    let state = mock_state(catalogue, MockStoreRegistrationCommand::new());

    let response = send(state, actix_test::TestRequest::get().uri(uri)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn create_returns_created_with_location() {
    let mut registration = MockStoreRegistrationCommand::new();
    registration
        .expect_create_store()
        .withf(|submission| submission.name == "Cafe")
        .times(1)
        .return_once(|_| Ok(sample_store("Cafe", "cafe-2")));
    let state = mock_state(MockStoreCatalogueQuery::new(), registration);

    let response = send(
        state,
        actix_test::TestRequest::post()
            .uri("/api/v1/stores")
            .set_json(submission_body()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert_eq!(location.as_deref(), Some("/store/cafe-2"));
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["slug"], "cafe-2");
}

#[rstest]
#[actix_web::test]
async fn malformed_bodies_use_the_error_envelope() {
    let mut registration = MockStoreRegistrationCommand::new();
    registration.expect_create_store().times(0);
    let state = mock_state(MockStoreCatalogueQuery::new(), registration);

    let response = send(
        state,
        actix_test::TestRequest::post()
            .uri("/api/v1/stores")
            .set_json(json!({ "name": "Cafe" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "body");
}

#[rstest]
#[actix_web::test]
async fn slug_conflicts_are_409() {
    let mut registration = MockStoreRegistrationCommand::new();
    registration.expect_create_store().return_once(|_| {
        Err(Error::conflict("could not assign a unique slug")
            .with_details(json!({ "field": "slug", "attempts": 3 })))
    });
    let state = mock_state(MockStoreCatalogueQuery::new(), registration);

    let response = send(
        state,
        actix_test::TestRequest::post()
            .uri("/api/v1/stores")
            .set_json(submission_body()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[rstest]
#[actix_web::test]
async fn update_targets_the_parsed_id() {
    let id = Uuid::new_v4();
    let mut registration = MockStoreRegistrationCommand::new();
    registration
        .expect_update_store()
        .withf(move |target, _| *target == id)
        .times(1)
        .return_once(|_, _| Ok(sample_store("Cafe", "cafe")));
    let state = mock_state(MockStoreCatalogueQuery::new(), registration);

    let response = send(
        state,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/stores/{id}"))
            .set_json(submission_body()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn update_rejects_malformed_ids() {
    let mut registration = MockStoreRegistrationCommand::new();
    registration.expect_update_store().times(0);
    let state = mock_state(MockStoreCatalogueQuery::new(), registration);

    let response = send(
        state,
        actix_test::TestRequest::put()
            .uri("/api/v1/stores/not-a-uuid")
            .set_json(submission_body()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "invalid_uuid");
}
