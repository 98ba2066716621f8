//! The module router mounted behind the ingress middleware stack, with
//! sessions resolved from bearer tokens.

mod common;

use std::collections::BTreeMap;

use api_ingress::{ApiIngress, ApiIngressConfig};
use axum::http::{Method, StatusCode};
use axum::Router;
use ghc_api::config::GhcApiConfig;
use ghc_api::domain::session::{RoleType, Session};
use ghc_api::infra::seed::{DEMO_LOCATOR, DEMO_OFFICE_USER_ID};
use ghc_api::GhcApi;

use common::{request, send, url};

const TOO_TOKEN: &str = "too-token";

fn app() -> Router {
    let mut sessions = BTreeMap::new();
    sessions.insert(
        TOO_TOKEN.to_string(),
        Session::office(DEMO_OFFICE_USER_ID, [RoleType::Too]),
    );
    let api = GhcApi::from_config(GhcApiConfig {
        sessions,
        ..GhcApiConfig::default()
    })
    .unwrap();
    ApiIngress::new(ApiIngressConfig::default()).build_router(api.router())
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[tokio::test]
async fn health_is_served_next_to_module_routes() {
    let resp = send(app(), request(Method::GET, "/health").build()).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["status"], "healthy");
}

#[tokio::test]
async fn bearer_token_resolves_to_an_office_session() {
    let resp = send(
        app(),
        request(Method::GET, &url(&format!("/moves/{DEMO_LOCATOR}")))
            .header("authorization", bearer(TOO_TOKEN))
            .build(),
    )
    .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["locator"], DEMO_LOCATOR);
    assert!(resp.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn unknown_token_is_unauthorized() {
    let resp = send(
        app(),
        request(Method::GET, &url(&format!("/moves/{DEMO_LOCATOR}")))
            .header("authorization", bearer("nobody"))
            .build(),
    )
    .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn problem_trace_id_matches_generated_request_id() {
    let resp = send(
        app(),
        request(Method::GET, &url("/moves/ZZZZ9999"))
            .header("authorization", bearer(TOO_TOKEN))
            .build(),
    )
    .await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    let request_id = resp.headers["x-request-id"].to_str().unwrap().to_string();
    assert_eq!(resp.json()["traceId"], request_id);
}

#[tokio::test]
async fn paths_outside_the_module_fall_through_to_ingress() {
    let resp = send(app(), request(Method::GET, "/nowhere").build()).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.json()["code"], "ROUTE_NOT_FOUND");
}

#[tokio::test]
async fn openapi_document_is_published() {
    let resp = send(app(), request(Method::GET, &url("/openapi.json")).build()).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["info"]["title"], "GHC Office API");
}
