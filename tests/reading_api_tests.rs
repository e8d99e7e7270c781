// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Green reading API tests.

use axum::{
    body::Body,
    http::{header, StatusCode},
};
use serde_json::{json, Value};

mod common;
use common::{authed, body_json, create_course, json_body, send, sign_up};

fn reading(pin: &str, direction: &str) -> Value {
    json!({
        "pin_position": pin,
        "distance_on": 33,
        "distance_from_side": 5,
        "side_from": "left",
        "approach_direction": direction,
        "break_description": "left to right",
    })
}

async fn first_hole(app: &axum::Router, token: &str) -> String {
    let created = create_course(app, token, "Augusta").await;
    created["holes"][0]["id"].as_str().unwrap().to_string()
}

async fn post_readings(
    app: &axum::Router,
    token: &str,
    hole_id: &str,
    readings: Vec<Value>,
) -> axum::response::Response {
    send(
        app,
        authed("POST", &format!("/api/holes/{hole_id}/readings"), token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(json_body(json!({ "readings": readings })))
            .unwrap(),
    )
    .await
}

#[tokio::test]
async fn test_insert_four_then_list() {
    let (app, _) = common::create_test_app();
    let (token, user_id) = sign_up(&app, "golfer@example.com").await;
    let hole_id = first_hole(&app, &token).await;

    let batch = ["front", "back", "left", "right"]
        .iter()
        .map(|d| reading("Back tier", d))
        .collect();
    let response = post_readings(&app, &token, &hole_id, batch).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let saved = body_json(response).await;
    let saved = saved.as_array().unwrap();
    assert_eq!(saved.len(), 4);
    for row in saved {
        assert_eq!(row["user_id"], user_id.as_str());
        assert_eq!(row["hole_id"], hole_id.as_str());
        assert_eq!(row["notes"], "");
    }

    let response = send(
        &app,
        authed("GET", &format!("/api/holes/{hole_id}/readings"), &token)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_readings_newest_first() {
    let (app, _) = common::create_test_app();
    let (token, _) = sign_up(&app, "golfer@example.com").await;
    let hole_id = first_hole(&app, &token).await;

    post_readings(&app, &token, &hole_id, vec![reading("first", "front")]).await;
    post_readings(&app, &token, &hole_id, vec![reading("second", "front")]).await;

    let response = send(
        &app,
        authed("GET", &format!("/api/holes/{hole_id}/readings"), &token)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let list = body_json(response).await;
    assert_eq!(list[0]["pin_position"], "second");
    assert_eq!(list[1]["pin_position"], "first");
}

#[tokio::test]
async fn test_batch_size_limits() {
    let (app, _) = common::create_test_app();
    let (token, _) = sign_up(&app, "golfer@example.com").await;
    let hole_id = first_hole(&app, &token).await;

    let response = post_readings(&app, &token, &hole_id, vec![]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let five = (0..5).map(|_| reading("Back tier", "front")).collect();
    let response = post_readings(&app, &token, &hole_id, five).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_reading_rejects_whole_batch() {
    let (app, _) = common::create_test_app();
    let (token, _) = sign_up(&app, "golfer@example.com").await;
    let hole_id = first_hole(&app, &token).await;

    let mut bad = reading("Back tier", "back");
    bad["distance_on"] = json!(5000);
    let response = post_readings(&app, &token, &hole_id, vec![reading("ok", "front"), bad]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_readings(&app, &token, &hole_id, vec![reading("", "front")]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut unknown = reading("Back tier", "front");
    unknown["side_from"] = json!("center");
    let response = post_readings(&app, &token, &hole_id, vec![unknown]).await;
    assert!(response.status().is_client_error());

    let response = send(
        &app,
        authed("GET", &format!("/api/holes/{hole_id}/readings"), &token)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert!(body_json(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_other_users_hole_is_not_found() {
    let (app, _) = common::create_test_app();
    let (alice, _) = sign_up(&app, "alice@example.com").await;
    let (bob, _) = sign_up(&app, "bob@example.com").await;
    let hole_id = first_hole(&app, &alice).await;

    let response = post_readings(&app, &bob, &hole_id, vec![reading("sneaky", "front")]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        authed("GET", &format!("/api/holes/{hole_id}/readings"), &bob)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_id_in_body_is_ignored() {
    let (app, _) = common::create_test_app();
    let (alice, alice_id) = sign_up(&app, "alice@example.com").await;
    let (_, bob_id) = sign_up(&app, "bob@example.com").await;
    let hole_id = first_hole(&app, &alice).await;

    let mut row = reading("Back tier", "front");
    row["user_id"] = json!(bob_id);
    let response = post_readings(&app, &alice, &hole_id, vec![row]).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await[0]["user_id"], alice_id.as_str());
}
