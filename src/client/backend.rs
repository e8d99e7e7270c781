// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backend access for the client views.
//!
//! [`Backend`] is the seam every view talks through. [`HttpBackend`] speaks
//! the service's HTTP API; it keeps the session token in memory and
//! broadcasts [`AuthEvent`]s when the signed-in user changes.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::middleware::api_key::API_KEY_HEADER;
use crate::models::{
    Course, Credentials, GreenReading, Hole, InsertReadingsRequest, NewCourse, NewGreenReading,
    User,
};

/// Client-side failures.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Status { status: 401, .. })
    }
}

/// Change in who is signed in.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(User),
    SignedOut,
}

/// Operations the views need from the backend.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<User, ClientError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, ClientError>;

    /// Drop the local session first, then revoke it server-side.
    async fn sign_out(&self) -> Result<(), ClientError>;

    /// `None` when no session is active.
    async fn current_user(&self) -> Result<Option<User>, ClientError>;

    /// Session-change notifications. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;

    async fn list_courses(&self) -> Result<Vec<Course>, ClientError>;

    async fn create_course(&self, name: &str) -> Result<(Course, Vec<Hole>), ClientError>;

    async fn list_holes(&self, course_id: Uuid) -> Result<Vec<Hole>, ClientError>;

    async fn provision_holes(&self, course_id: Uuid) -> Result<Vec<Hole>, ClientError>;

    /// Newest first.
    async fn list_readings(&self, hole_id: Uuid) -> Result<Vec<GreenReading>, ClientError>;

    async fn insert_readings(
        &self,
        hole_id: Uuid,
        readings: Vec<NewGreenReading>,
    ) -> Result<Vec<GreenReading>, ClientError>;
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
    user: User,
}

#[derive(Deserialize)]
struct CreateCourseResponse {
    course: Course,
    holes: Vec<Hole>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

/// HTTP implementation of [`Backend`].
#[derive(Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    token: Arc<Mutex<Option<String>>>,
    events: broadcast::Sender<AuthEvent>,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            http: reqwest::Client::new(),
            base_url: config.backend_url,
            api_key: config.api_key,
            token: Arc::new(Mutex::new(None)),
            events,
        }
    }

    /// Whether a session token is cached locally.
    pub fn has_token(&self) -> bool {
        self.token_slot().is_some()
    }

    fn token_slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header(API_KEY_HEADER, &self.api_key)
    }

    fn authed(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let token = self.token_slot().clone().ok_or(ClientError::NotAuthenticated)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    fn notify(&self, event: AuthEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }

    async fn credentials_call(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ClientError> {
        let body = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .request(reqwest::Method::POST, path)
            .json(&body)
            .send()
            .await?;
        let auth: AuthResponse = check_response_json(response).await?;

        *self.token_slot() = Some(auth.token);
        tracing::debug!(user_id = %auth.user.id, "Session started");
        self.notify(AuthEvent::SignedIn(auth.user.clone()));
        Ok(auth.user)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.authed(reqwest::Method::GET, path)?.send().await?;
        check_response_json(response).await
    }
}

impl Backend for HttpBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<User, ClientError> {
        self.credentials_call("/auth/signup", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, ClientError> {
        self.credentials_call("/auth/signin", email, password).await
    }

    /// The token is kept until the service confirms the session is gone, so
    /// a later session check still reaches the service after a failure.
    async fn sign_out(&self) -> Result<(), ClientError> {
        let Some(token) = self.token_slot().clone() else {
            return Ok(());
        };

        let response = self
            .request(reqwest::Method::POST, "/auth/signout")
            .bearer_auth(&token)
            .send()
            .await?;

        match check_response(response).await {
            Ok(()) => {}
            // Already gone server-side.
            Err(e) if e.is_unauthorized() => {}
            Err(e) => return Err(e),
        }

        let mut slot = self.token_slot();
        // A sign-in that finished meanwhile owns the slot now.
        if slot.as_deref() == Some(token.as_str()) {
            *slot = None;
            drop(slot);
            self.notify(AuthEvent::SignedOut);
        }
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<User>, ClientError> {
        let request = match self.authed(reqwest::Method::GET, "/auth/user") {
            Ok(request) => request,
            Err(ClientError::NotAuthenticated) => return Ok(None),
            Err(e) => return Err(e),
        };

        match check_response_json::<User>(request.send().await?).await {
            Ok(user) => Ok(Some(user)),
            Err(e) if e.is_unauthorized() => {
                // Revoked or expired elsewhere; forget it.
                if self.token_slot().take().is_some() {
                    self.notify(AuthEvent::SignedOut);
                }
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    async fn list_courses(&self) -> Result<Vec<Course>, ClientError> {
        self.get_json("/api/courses").await
    }

    async fn create_course(&self, name: &str) -> Result<(Course, Vec<Hole>), ClientError> {
        let body = NewCourse {
            name: name.to_string(),
        };
        let response = self
            .authed(reqwest::Method::POST, "/api/courses")?
            .json(&body)
            .send()
            .await?;
        let created: CreateCourseResponse = check_response_json(response).await?;
        Ok((created.course, created.holes))
    }

    async fn list_holes(&self, course_id: Uuid) -> Result<Vec<Hole>, ClientError> {
        self.get_json(&format!("/api/courses/{course_id}/holes")).await
    }

    async fn provision_holes(&self, course_id: Uuid) -> Result<Vec<Hole>, ClientError> {
        let response = self
            .authed(reqwest::Method::POST, &format!("/api/courses/{course_id}/holes"))?
            .send()
            .await?;
        check_response_json(response).await
    }

    async fn list_readings(&self, hole_id: Uuid) -> Result<Vec<GreenReading>, ClientError> {
        self.get_json(&format!("/api/holes/{hole_id}/readings")).await
    }

    async fn insert_readings(
        &self,
        hole_id: Uuid,
        readings: Vec<NewGreenReading>,
    ) -> Result<Vec<GreenReading>, ClientError> {
        let body = InsertReadingsRequest { readings };
        let response = self
            .authed(reqwest::Method::POST, &format!("/api/holes/{hole_id}/readings"))?
            .json(&body)
            .send()
            .await?;
        check_response_json(response).await
    }
}

/// Check response status and return error if not successful.
async fn check_response(response: reqwest::Response) -> Result<(), ClientError> {
    if response.status().is_success() {
        return Ok(());
    }
    Err(status_error(response).await)
}

/// Check response and parse JSON body.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(status_error(response).await);
    }
    Ok(response.json::<T>().await?)
}

async fn status_error(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            details: Some(details),
            ..
        }) => details,
        Ok(ErrorBody { error, .. }) => error,
        Err(_) => body,
    };

    tracing::warn!(status, message = %message, "Backend request failed");
    ClientError::Status { status, message }
}
