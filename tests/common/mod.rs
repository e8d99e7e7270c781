// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, request, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use green_book::client::HttpBackend;
use green_book::config::{ClientConfig, Config};
use green_book::routes::create_router;
use green_book::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Public API key used by [`Config::test_default`].
#[allow(dead_code)]
pub const API_KEY: &str = "test_public_api_key";

/// Create a test app over a fresh in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();
    create_test_app_with_config(config)
}

fn create_test_app_with_config(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config).expect("in-memory state"));
    (create_router(state.clone()), state)
}

/// Request builder carrying the API key.
#[allow(dead_code)]
pub fn keyed(method: &str, uri: &str) -> request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("apikey", API_KEY)
}

/// Request builder carrying the API key and a bearer token.
#[allow(dead_code)]
pub fn authed(method: &str, uri: &str, token: &str) -> request::Builder {
    keyed(method, uri).header(header::AUTHORIZATION, format!("Bearer {token}"))
}

#[allow(dead_code)]
pub fn json_body(value: Value) -> Body {
    Body::from(value.to_string())
}

#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Sign up and return the session token and user id.
#[allow(dead_code)]
pub async fn sign_up(app: &Router, email: &str) -> (String, String) {
    let response = send(
        app,
        keyed("POST", "/auth/signup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(json_body(
                serde_json::json!({ "email": email, "password": "correct horse" }),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

/// Create a course and return its JSON (`{course, holes}`).
#[allow(dead_code)]
pub async fn create_course(app: &Router, token: &str, name: &str) -> Value {
    let response = send(
        app,
        authed("POST", "/api/courses", token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(json_body(serde_json::json!({ "name": name })))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Serve a fresh app on an ephemeral local port. Returns its base URL.
#[allow(dead_code)]
pub async fn spawn_server() -> (String, Arc<AppState>) {
    let (app, state) = create_test_app();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

#[allow(dead_code)]
pub fn http_backend(base_url: &str) -> HttpBackend {
    HttpBackend::new(ClientConfig {
        backend_url: base_url.to_string(),
        api_key: API_KEY.to_string(),
    })
}
