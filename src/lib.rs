// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Green Book: green-reading notes for golf courses
//!
//! This crate provides the backend API that stores courses, holes and green
//! readings per user, and the client library whose view state drives the
//! sign-in, course selection, reading capture and reading browsing flows.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::SessionService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub sessions: SessionService,
}

impl AppState {
    /// Open the configured database and wire up services.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let db = Database::open(&config.database_path)?;
        let sessions = SessionService::new(
            db.clone(),
            config.jwt_signing_key.clone(),
            config.session_ttl_days,
        );

        Ok(Self {
            config,
            db,
            sessions,
        })
    }
}
