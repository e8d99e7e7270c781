// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public API key check for `/auth/*` and `/api/*` routes.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Header every client sends with the public API key.
pub const API_KEY_HEADER: &str = "apikey";

/// Reject requests that do not carry the configured public API key.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let presented = request.headers().get(API_KEY_HEADER);
    let is_valid = presented
        .and_then(|h| h.to_str().ok())
        .map(|key| {
            key.as_bytes()
                .ct_eq(state.config.public_api_key.as_bytes())
                .into()
        })
        .unwrap_or(false);

    if !is_valid {
        tracing::warn!(
            present = presented.is_some(),
            path = %request.uri().path(),
            "Blocked request with missing or wrong API key"
        );
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}
