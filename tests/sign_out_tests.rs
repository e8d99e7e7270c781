// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-out retry behavior against scripted and stuck backends.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use green_book::client::{sign_out, AuthEvent, Backend, ClientError, SessionGate, View};
use green_book::models::{Course, GreenReading, Hole, NewGreenReading, User};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;
use tokio::sync::broadcast;
use uuid::Uuid;

mod common;

/// Answers session checks from a script; everything else is unused.
struct ScriptedBackend {
    sign_out_calls: AtomicU8,
    fail_sign_out: bool,
    checks: Mutex<VecDeque<Result<Option<User>, ClientError>>>,
    events: broadcast::Sender<AuthEvent>,
}

impl ScriptedBackend {
    fn new(checks: Vec<Result<Option<User>, ClientError>>) -> Self {
        Self {
            sign_out_calls: AtomicU8::new(0),
            fail_sign_out: false,
            checks: Mutex::new(checks.into()),
            events: broadcast::channel(4).0,
        }
    }

    fn calls(&self) -> u8 {
        self.sign_out_calls.load(Ordering::SeqCst)
    }
}

fn user() -> User {
    User {
        id: Uuid::new_v4(),
        email: "golfer@example.com".to_string(),
        created_at: Utc::now(),
    }
}

fn unused<T>() -> Result<T, ClientError> {
    Err(ClientError::Validation("not scripted".to_string()))
}

impl Backend for ScriptedBackend {
    async fn sign_up(&self, _: &str, _: &str) -> Result<User, ClientError> {
        unused()
    }

    async fn sign_in(&self, _: &str, _: &str) -> Result<User, ClientError> {
        unused()
    }

    async fn sign_out(&self) -> Result<(), ClientError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out {
            return Err(ClientError::Status {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<User>, ClientError> {
        self.checks.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    async fn list_courses(&self) -> Result<Vec<Course>, ClientError> {
        unused()
    }

    async fn create_course(&self, _: &str) -> Result<(Course, Vec<Hole>), ClientError> {
        unused()
    }

    async fn list_holes(&self, _: Uuid) -> Result<Vec<Hole>, ClientError> {
        unused()
    }

    async fn provision_holes(&self, _: Uuid) -> Result<Vec<Hole>, ClientError> {
        unused()
    }

    async fn list_readings(&self, _: Uuid) -> Result<Vec<GreenReading>, ClientError> {
        unused()
    }

    async fn insert_readings(
        &self,
        _: Uuid,
        _: Vec<NewGreenReading>,
    ) -> Result<Vec<GreenReading>, ClientError> {
        unused()
    }
}

#[tokio::test]
async fn test_single_sign_out_when_confirmed() {
    let backend = ScriptedBackend::new(vec![Ok(None)]);

    let report = sign_out(&backend).await;
    assert_eq!(backend.calls(), 1);
    assert_eq!(report.attempts, 1);
    assert!(report.verified);
}

#[tokio::test]
async fn test_retries_once_when_user_lingers() {
    let backend = ScriptedBackend::new(vec![Ok(Some(user())), Ok(None)]);

    let report = sign_out(&backend).await;
    assert_eq!(backend.calls(), 2);
    assert_eq!(report.attempts, 2);
    assert!(report.verified);
}

#[tokio::test]
async fn test_no_third_attempt() {
    let backend = ScriptedBackend::new(vec![Ok(Some(user())), Ok(Some(user()))]);

    let report = sign_out(&backend).await;
    assert_eq!(backend.calls(), 2);
    assert!(!report.verified);
}

#[tokio::test]
async fn test_gate_reaches_entry_despite_errors() {
    let mut backend = ScriptedBackend::new(vec![
        Ok(Some(user())),
        Err(ClientError::Status {
            status: 500,
            message: "boom".to_string(),
        }),
    ]);
    backend.fail_sign_out = true;

    let mut gate = SessionGate::mount(&backend).await;
    assert_eq!(gate.view(), View::Main);

    let report = gate.sign_out(&backend).await;
    assert_eq!(backend.calls(), 1);
    assert!(!report.verified);
    assert_eq!(gate.view(), View::Entry);
    assert!(gate.user().is_none());
    assert!(gate.last_error().is_some());
}

/// Signs in and reports the user, but never manages to end the session.
async fn spawn_stuck_service(user: User) -> String {
    let signin_user = user.clone();
    let app = Router::new()
        .route(
            "/auth/signin",
            post(move || {
                let user = signin_user.clone();
                async move { Json(json!({ "token": "stuck-token", "user": user })) }
            }),
        )
        .route(
            "/auth/signout",
            post(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "error": "unavailable" })),
                )
            }),
        )
        .route(
            "/auth/user",
            get(move || {
                let user = user.clone();
                async move { Json(user) }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_failed_http_sign_out_is_not_verified() {
    let url = spawn_stuck_service(user()).await;
    let backend = common::http_backend(&url);
    backend.sign_in("golfer@example.com", "x").await.unwrap();
    let mut events = backend.subscribe();

    let report = sign_out(&backend).await;
    assert_eq!(report.attempts, 2);
    assert!(!report.verified);
    // The session may still be live, so the token is kept.
    assert!(backend.has_token());
    assert!(events.try_recv().is_err());
}
