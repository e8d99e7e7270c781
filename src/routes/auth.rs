// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password account routes and session lifecycle.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{AuthUser, TOKEN_COOKIE};
use crate::models::{Credentials, User, UserRecord};
use crate::services::{hash_password, verify_password_or_placeholder};
use crate::AppState;

/// Routes reachable with only the public API key.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
}

/// Routes that also need a live session.
pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/user", get(current_user))
        .route("/auth/signout", post(signout))
}

/// Token and account returned by sign-up and sign-in.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.frontend_url.starts_with("https://"))
        .build()
}

/// Create an account and start a session for it.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    credentials.validate()?;
    let email = credentials.normalized_email();

    // CPU-bound
    let password = credentials.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("hashing task failed: {e}")))??;

    let user = User {
        id: Uuid::new_v4(),
        email,
        created_at: Utc::now(),
    };
    let record = UserRecord {
        user: user.clone(),
        password_hash,
    };

    state
        .db
        .insert_user(&record)
        .await
        .map_err(|e| match AppError::from_db(e) {
            AppError::Conflict(_) => {
                AppError::Conflict("an account with this email already exists".to_string())
            }
            other => other,
        })?;

    let (token, _) = state.sessions.issue(user.id).await?;
    tracing::info!(user_id = %user.id, "Account created");

    let jar = jar.add(session_cookie(&state, token.clone()));
    Ok((StatusCode::CREATED, jar, Json(AuthResponse { token, user })))
}

/// Verify credentials and start a session.
async fn signin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let email = credentials.normalized_email();

    let record = state
        .db
        .get_user_by_email(&email)
        .await
        .map_err(AppError::from_db)?;

    // Unknown emails still pay for a hash check.
    let password = credentials.password;
    let stored = record.as_ref().map(|r| r.password_hash.clone());
    let valid = tokio::task::spawn_blocking(move || {
        verify_password_or_placeholder(&password, stored.as_deref())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("verify task failed: {e}")))?;

    let record = match record {
        Some(record) if valid => record,
        Some(record) => {
            tracing::info!(user_id = %record.user.id, "Sign-in with wrong password");
            return Err(AppError::InvalidCredentials);
        }
        None => {
            tracing::info!("Sign-in for unknown email");
            return Err(AppError::InvalidCredentials);
        }
    };

    let (token, _) = state.sessions.issue(record.user.id).await?;

    let jar = jar.add(session_cookie(&state, token.clone()));
    Ok((
        jar,
        Json(AuthResponse {
            token,
            user: record.user,
        }),
    ))
}

/// Revoke the current session.
async fn signout(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar)> {
    state.sessions.revoke(auth.session_id).await?;

    let jar = jar.remove(Cookie::build(TOKEN_COOKIE).path("/"));
    Ok((StatusCode::NO_CONTENT, jar))
}

/// The account behind the current session.
async fn current_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<User>> {
    let user = state
        .db
        .get_user(auth.user_id)
        .await
        .map_err(AppError::from_db)?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(user))
}
