// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Keyed routes reject requests without the public API key
//! 2. Protected routes reject missing, invalid and revoked tokens
//! 3. Sign-up, sign-in and sign-out behave as a session lifecycle
//! 4. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;

mod common;
use common::{authed, body_json, json_body, keyed, send, sign_up};

#[tokio::test]
async fn test_missing_api_key_rejected() {
    let (app, _) = common::create_test_app();

    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/auth/signin")
            .header(header::CONTENT_TYPE, "application/json")
            .body(json_body(json!({ "email": "a@b.com", "password": "secret1" })))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        Request::builder()
            .uri("/api/courses")
            .header("apikey", "wrong-key")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _) = common::create_test_app();

    let response = send(&app, keyed("GET", "/api/courses").body(Body::empty()).unwrap()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _) = common::create_test_app();

    let response = send(
        &app,
        authed("GET", "/api/courses", "invalid.token.here")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_up_then_current_user() {
    let (app, _) = common::create_test_app();
    let (token, user_id) = sign_up(&app, "Golfer@Example.com").await;

    let response = send(&app, authed("GET", "/auth/user", &token).body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let user = body_json(response).await;
    assert_eq!(user["id"], user_id.as_str());
    assert_eq!(user["email"], "golfer@example.com");
}

#[tokio::test]
async fn test_duplicate_sign_up_conflicts() {
    let (app, _) = common::create_test_app();
    sign_up(&app, "golfer@example.com").await;

    let response = send(
        &app,
        keyed("POST", "/auth/signup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(json_body(
                json!({ "email": "GOLFER@example.com", "password": "another pw" }),
            ))
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_sign_in_checks_password() {
    let (app, _) = common::create_test_app();
    sign_up(&app, "golfer@example.com").await;

    let sign_in = |password: &'static str| {
        keyed("POST", "/auth/signin")
            .header(header::CONTENT_TYPE, "application/json")
            .body(json_body(
                json!({ "email": "golfer@example.com", "password": password }),
            ))
            .unwrap()
    };

    let response = send(&app, sign_in("wrong password")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "invalid_credentials");

    let response = send(&app, sign_in("correct horse")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["token"].is_string());
}

#[tokio::test]
async fn test_unknown_email_is_invalid_credentials() {
    let (app, _) = common::create_test_app();

    let response = send(
        &app,
        keyed("POST", "/auth/signin")
            .header(header::CONTENT_TYPE, "application/json")
            .body(json_body(
                json!({ "email": "nobody@example.com", "password": "whatever" }),
            ))
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_out_revokes_token() {
    let (app, _) = common::create_test_app();
    let (token, _) = sign_up(&app, "golfer@example.com").await;

    let response = send(&app, authed("POST", "/auth/signout", &token).body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The JWT is still unexpired, but its session is gone.
    let response = send(&app, authed("GET", "/auth/user", &token).body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, authed("POST", "/auth/signout", &token).body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let (app, state) = common::create_test_app();
    let (first, user_id) = sign_up(&app, "golfer@example.com").await;
    let (second, _) = state
        .sessions
        .issue(user_id.parse().unwrap())
        .await
        .unwrap();

    send(&app, authed("POST", "/auth/signout", &first).body(Body::empty()).unwrap()).await;

    let response = send(&app, authed("GET", "/auth/user", &second).body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = common::create_test_app();

    let response = send(
        &app,
        Request::builder()
            .method("OPTIONS")
            .uri("/api/courses")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "apikey,authorization")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_health_needs_no_key() {
    let (app, _) = common::create_test_app();

    let response = send(
        &app,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}
