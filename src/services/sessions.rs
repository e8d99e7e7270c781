// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in sessions: issuing, validating and revoking.
//!
//! A token is only honored while its session row exists, so sign-out takes
//! effect immediately even though the JWT itself has not expired. Validated
//! sessions are cached in memory and evicted on revocation. Revoked ids are
//! remembered until the session would have expired, so a lookup that raced
//! the revocation cannot put the session back into the cache.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::AppError;
use crate::middleware::auth::{create_jwt, decode_jwt, AuthUser};
use crate::models::AuthSession;

#[derive(Debug, Clone, Copy)]
struct CachedSession {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

/// Session issuing and validation, shared across request handlers.
#[derive(Clone)]
pub struct SessionService {
    db: Database,
    signing_key: Arc<Vec<u8>>,
    ttl: Duration,
    cache: Arc<DashMap<Uuid, CachedSession>>,
    /// Revoked session id -> latest time its token could still verify
    revoked: Arc<DashMap<Uuid, DateTime<Utc>>>,
}

impl SessionService {
    pub fn new(db: Database, signing_key: Vec<u8>, ttl_days: i64) -> Self {
        Self {
            db,
            signing_key: Arc::new(signing_key),
            ttl: Duration::days(ttl_days),
            cache: Arc::new(DashMap::new()),
            revoked: Arc::new(DashMap::new()),
        }
    }

    /// Start a session for `user_id` and return its signed token.
    pub async fn issue(&self, user_id: Uuid) -> Result<(String, AuthSession), AppError> {
        let now = Utc::now();
        let session = AuthSession {
            id: Uuid::new_v4(),
            user_id,
            created_at: now,
            expires_at: now + self.ttl,
        };

        self.db
            .insert_session(&session)
            .await
            .map_err(AppError::from_db)?;

        let token = create_jwt(&session, &self.signing_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

        self.cache.insert(
            session.id,
            CachedSession {
                user_id,
                expires_at: session.expires_at,
            },
        );

        tracing::info!(user_id = %user_id, session_id = %session.id, "Session issued");
        Ok((token, session))
    }

    /// Validate a token: signature, expiry, and that its session is still live.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AppError> {
        let claims = decode_jwt(token, &self.signing_key).map_err(|_| AppError::InvalidToken)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;
        let session_id = Uuid::parse_str(&claims.sid).map_err(|_| AppError::InvalidToken)?;
        let now = Utc::now();

        if self.revoked.contains_key(&session_id) {
            return Err(AppError::InvalidToken);
        }

        let cached = self.cache.get(&session_id).map(|entry| *entry.value());
        let live = match cached {
            Some(entry) => entry,
            None => {
                let session = self
                    .db
                    .get_session(session_id)
                    .await
                    .map_err(AppError::from_db)?
                    .ok_or(AppError::InvalidToken)?;
                let entry = CachedSession {
                    user_id: session.user_id,
                    expires_at: session.expires_at,
                };
                self.cache.insert(session_id, entry);
                // Revocation may have landed between the read and the insert.
                if self.revoked.contains_key(&session_id) {
                    self.cache.remove(&session_id);
                    return Err(AppError::InvalidToken);
                }
                entry
            }
        };

        if live.user_id != user_id {
            tracing::warn!(session_id = %session_id, "Token subject does not match session owner");
            return Err(AppError::InvalidToken);
        }
        if live.expires_at <= now {
            self.cache.remove(&session_id);
            return Err(AppError::InvalidToken);
        }

        Ok(AuthUser {
            user_id,
            session_id,
        })
    }

    /// End a session. Idempotent.
    pub async fn revoke(&self, session_id: Uuid) -> Result<(), AppError> {
        let until = self
            .cache
            .get(&session_id)
            .map(|entry| entry.expires_at)
            .unwrap_or_else(|| Utc::now() + self.ttl);
        // Tombstone before eviction: authenticate checks it after refilling.
        self.revoked.insert(session_id, until);
        self.cache.remove(&session_id);
        let removed = self
            .db
            .delete_session(session_id)
            .await
            .map_err(AppError::from_db)?;
        tracing::info!(session_id = %session_id, removed, "Session revoked");
        Ok(())
    }

    /// Delete expired sessions from storage, cache and the revoked list.
    pub async fn purge_expired(&self) -> Result<usize, AppError> {
        let now = Utc::now();
        self.cache.retain(|_, entry| entry.expires_at > now);
        self.revoked.retain(|_, until| *until > now);
        self.db
            .delete_expired_sessions(now)
            .await
            .map_err(AppError::from_db)
    }

    /// Run [`Self::purge_expired`] every `period` for the life of the process.
    pub fn spawn_purge_task(&self, period: std::time::Duration) -> tokio::task::JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match service.purge_expired().await {
                    Ok(0) => {}
                    Ok(purged) => tracing::info!(purged, "Expired sessions purged"),
                    Err(e) => tracing::warn!(error = %e, "Failed to purge expired sessions"),
                }
            }
        })
    }
}
