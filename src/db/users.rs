// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User accounts and sign-in sessions.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{parse_uuid, Database};
use crate::models::{AuthSession, User, UserRecord};
use crate::time_utils::{format_utc_rfc3339, parse_utc_rfc3339};

fn row_to_user_record(row: &Row) -> Result<UserRecord> {
    let id: String = row.get("id")?;
    let created_at: String = row.get("created_at")?;

    Ok(UserRecord {
        user: User {
            id: parse_uuid(&id, "user id")?,
            email: row.get("email")?,
            created_at: parse_utc_rfc3339(&created_at, "created_at")?,
        },
        password_hash: row.get("password_hash")?,
    })
}

fn row_to_session(row: &Row) -> Result<AuthSession> {
    let id: String = row.get("id")?;
    let user_id: String = row.get("user_id")?;
    let created_at: String = row.get("created_at")?;
    let expires_at: String = row.get("expires_at")?;

    Ok(AuthSession {
        id: parse_uuid(&id, "session id")?,
        user_id: parse_uuid(&user_id, "user id")?,
        created_at: parse_utc_rfc3339(&created_at, "created_at")?,
        expires_at: parse_utc_rfc3339(&expires_at, "expires_at")?,
    })
}

impl Database {
    // ─── Users ───────────────────────────────────────────────────

    /// Insert a new account. A duplicate email surfaces as a constraint violation.
    pub async fn insert_user(&self, record: &UserRecord) -> Result<()> {
        let record = record.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO users (id, email, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.user.id.to_string(),
                    record.user.email,
                    record.password_hash,
                    format_utc_rfc3339(record.user.created_at),
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let email = email.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, email, password_hash, created_at FROM users WHERE email = ?1",
            )?;
            let mut rows = stmt.query(params![email])?;
            let record = match rows.next()? {
                Some(row) => Some(row_to_user_record(row)?),
                None => None,
            };
            Ok(record)
        })
        .await
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, email, password_hash, created_at FROM users WHERE id = ?1",
            )?;
            let mut rows = stmt.query(params![user_id.to_string()])?;
            let user = match rows.next()? {
                Some(row) => Some(row_to_user_record(row)?.user),
                None => None,
            };
            Ok(user)
        })
        .await
    }

    // ─── Sessions ────────────────────────────────────────────────

    pub async fn insert_session(&self, session: &AuthSession) -> Result<()> {
        let session = session.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO auth_sessions (id, user_id, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    session.id.to_string(),
                    session.user_id.to_string(),
                    format_utc_rfc3339(session.created_at),
                    format_utc_rfc3339(session.expires_at),
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn get_session(&self, session_id: Uuid) -> Result<Option<AuthSession>> {
        self.execute(move |conn| {
            let session = conn
                .query_row(
                    "SELECT id, user_id, created_at, expires_at
                     FROM auth_sessions WHERE id = ?1",
                    params![session_id.to_string()],
                    |row| Ok(row_to_session(row)),
                )
                .optional()?
                .transpose()?;
            Ok(session)
        })
        .await
    }

    /// Revoke a session. Returns whether a row was removed.
    pub async fn delete_session(&self, session_id: Uuid) -> Result<bool> {
        self.execute(move |conn| {
            let removed = conn.execute(
                "DELETE FROM auth_sessions WHERE id = ?1",
                params![session_id.to_string()],
            )?;
            Ok(removed > 0)
        })
        .await
    }

    /// Drop every session that expired before `now`.
    pub async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<usize> {
        self.execute(move |conn| {
            let removed = conn.execute(
                "DELETE FROM auth_sessions WHERE expires_at <= ?1",
                params![format_utc_rfc3339(now)],
            )?;
            Ok(removed)
        })
        .await
    }
}
