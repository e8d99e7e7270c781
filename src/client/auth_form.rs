// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password sign-in and sign-up form.

use validator::Validate;

use crate::client::backend::{Backend, ClientError};
use crate::models::{Credentials, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

#[derive(Debug, Default)]
pub struct CredentialForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    loading: bool,
    last_error: Option<String>,
}

impl CredentialForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };
        self.last_error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn check(&self) -> Result<(), ClientError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ClientError::Validation(
                "email and password are required".to_string(),
            ));
        }
        if self.mode == AuthMode::SignUp {
            Credentials {
                email: self.email.trim().to_string(),
                password: self.password.clone(),
            }
            .validate()
            .map_err(|e| ClientError::Validation(e.to_string()))?;
        }
        Ok(())
    }

    /// Submit in the current mode.
    ///
    /// On success the password is cleared and the backend announces the new
    /// session to any subscribed gate. On failure the fields are kept.
    pub async fn submit<B: Backend>(&mut self, backend: &B) -> Result<User, ClientError> {
        if let Err(e) = self.check() {
            self.last_error = Some(e.to_string());
            return Err(e);
        }

        self.loading = true;
        let email = self.email.trim().to_string();
        let result = match self.mode {
            AuthMode::SignIn => backend.sign_in(&email, &self.password).await,
            AuthMode::SignUp => backend.sign_up(&email, &self.password).await,
        };
        self.loading = false;

        match result {
            Ok(user) => {
                self.password.clear();
                self.last_error = None;
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, mode = ?self.mode, "Authentication failed");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_rejected_locally() {
        let form = CredentialForm {
            email: "  ".to_string(),
            password: "secret".to_string(),
            ..Default::default()
        };
        assert!(matches!(form.check(), Err(ClientError::Validation(_))));
    }

    #[test]
    fn test_sign_up_checks_password_length() {
        let mut form = CredentialForm {
            email: "golfer@example.com".to_string(),
            password: "abc".to_string(),
            ..Default::default()
        };
        // Sign-in leaves strength to the server.
        assert!(form.check().is_ok());

        form.toggle_mode();
        assert_eq!(form.mode, AuthMode::SignUp);
        assert!(form.check().is_err());
    }
}
