// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session gate: decides between the entry view and the main view.

use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};

use crate::client::backend::{AuthEvent, Backend};
use crate::models::User;

/// Top-level view selected by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Session check still in flight
    Loading,
    /// Sign-in / sign-up
    Entry,
    /// Dashboard
    Main,
}

/// Owns the session state for the top-level view.
///
/// State only changes through [`SessionGate::mount`], session notifications,
/// and [`SessionGate::sign_out`]. Dropping the gate ends its subscription.
#[derive(Debug)]
pub struct SessionGate {
    view: View,
    user: Option<User>,
    events: Option<broadcast::Receiver<AuthEvent>>,
    last_error: Option<String>,
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGate {
    /// An unmounted gate showing the loading view.
    pub fn new() -> Self {
        Self {
            view: View::Loading,
            user: None,
            events: None,
            last_error: None,
        }
    }

    /// Subscribe to session changes, then check for an existing session.
    pub async fn mount<B: Backend>(backend: &B) -> Self {
        let mut gate = Self::new();
        // Subscribe first so a change during the check is not missed.
        gate.events = Some(backend.subscribe());

        match backend.current_user().await {
            Ok(Some(user)) => gate.enter_main(user),
            Ok(None) => gate.view = View::Entry,
            Err(e) => {
                tracing::warn!(error = %e, "Session check failed");
                gate.last_error = Some(e.to_string());
                gate.view = View::Entry;
            }
        }
        gate
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_subscribed(&self) -> bool {
        self.events.is_some()
    }

    /// End the subscription without dropping the gate.
    pub fn unmount(&mut self) {
        self.events = None;
    }

    fn enter_main(&mut self, user: User) {
        self.user = Some(user);
        self.view = View::Main;
        self.last_error = None;
    }

    fn enter_entry(&mut self) {
        self.user = None;
        self.view = View::Entry;
    }

    /// Apply one session notification.
    pub fn handle_event(&mut self, event: AuthEvent) {
        tracing::debug!(?event, "Session change");
        match event {
            AuthEvent::SignedIn(user) => self.enter_main(user),
            AuthEvent::SignedOut => self.enter_entry(),
        }
    }

    /// Apply every notification already queued. Returns how many were applied.
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let Some(events) = self.events.as_mut() else {
                return applied;
            };
            match events.try_recv() {
                Ok(event) => {
                    self.handle_event(event);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => return applied,
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Missed session notifications");
                }
                Err(TryRecvError::Closed) => {
                    self.events = None;
                    return applied;
                }
            }
        }
    }

    /// Wait for the next notification and apply it.
    ///
    /// Returns `None` once unsubscribed or the backend is gone.
    pub async fn next_event(&mut self) -> Option<AuthEvent> {
        loop {
            let events = self.events.as_mut()?;
            match events.recv().await {
                Ok(event) => {
                    self.handle_event(event.clone());
                    return Some(event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Missed session notifications");
                }
                Err(RecvError::Closed) => {
                    self.events = None;
                    return None;
                }
            }
        }
    }

    /// Sign out and land on the entry view whatever the backend says.
    pub async fn sign_out<B: Backend>(&mut self, backend: &B) -> SignOutReport {
        let report = sign_out(backend).await;
        if !report.verified {
            self.last_error = Some("sign-out could not be confirmed".to_string());
        }
        self.enter_entry();
        report
    }
}

/// What the sign-out routine observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignOutReport {
    /// Sign-out calls issued (1 or 2)
    pub attempts: u8,
    /// A session check after the last attempt showed no user
    pub verified: bool,
}

/// Sign out, confirm with a session check, and try once more if a user is
/// still current. Errors are logged, never returned.
pub async fn sign_out<B: Backend>(backend: &B) -> SignOutReport {
    let mut attempts = 1;
    if let Err(e) = backend.sign_out().await {
        tracing::warn!(error = %e, "Sign-out failed");
    }

    let still_signed_in = match backend.current_user().await {
        Ok(Some(user)) => {
            tracing::warn!(user_id = %user.id, "Still signed in after sign-out, retrying");
            true
        }
        Ok(None) => false,
        Err(e) => {
            tracing::warn!(error = %e, "Could not confirm sign-out");
            return SignOutReport {
                attempts,
                verified: false,
            };
        }
    };

    if !still_signed_in {
        tracing::info!("Signed out");
        return SignOutReport {
            attempts,
            verified: true,
        };
    }

    attempts += 1;
    if let Err(e) = backend.sign_out().await {
        tracing::warn!(error = %e, "Second sign-out failed");
    }
    let verified = matches!(backend.current_user().await, Ok(None));
    SignOutReport { attempts, verified }
}
