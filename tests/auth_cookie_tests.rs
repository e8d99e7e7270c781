// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth cookie attribute tests.
//!
//! Browser clients get the session token as a cookie on sign-up and lose it
//! on sign-out. The `Secure` flag follows the frontend URL scheme.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use serde_json::json;

mod common;
use common::{json_body, keyed, send};

fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}

async fn sign_up_response(app: &axum::Router) -> Response {
    send(
        app,
        keyed("POST", "/auth/signup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(json_body(
                json!({ "email": "golfer@example.com", "password": "correct horse" }),
            ))
            .unwrap(),
    )
    .await
}

#[tokio::test]
async fn test_sign_up_sets_localhost_cookie() {
    let (app, _) = common::create_test_app_with_frontend_url("http://localhost:5173");

    let response = sign_up_response(&app).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let cookie = find_cookie(&set_cookie_headers(&response), "green_book_token");
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn test_sign_up_sets_secure_cookie_for_https_frontend() {
    let (app, _) = common::create_test_app_with_frontend_url("https://greenbook.example.com");

    let response = sign_up_response(&app).await;
    let cookie = find_cookie(&set_cookie_headers(&response), "green_book_token");
    assert!(cookie.contains("Secure"));
}

#[tokio::test]
async fn test_cookie_authenticates_and_sign_out_clears_it() {
    let (app, _) = common::create_test_app();

    let response = sign_up_response(&app).await;
    let cookie = find_cookie(&set_cookie_headers(&response), "green_book_token");
    let pair = cookie.split(';').next().unwrap().to_string();

    let response = send(
        &app,
        keyed("GET", "/auth/user")
            .header(header::COOKIE, &pair)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        keyed("POST", "/auth/signout")
            .header(header::COOKIE, &pair)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let removal = find_cookie(&set_cookie_headers(&response), "green_book_token");
    assert!(removal.contains("Path=/"));
    assert!(removal.contains("Max-Age=0"));
}
