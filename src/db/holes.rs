// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hole operations. Ownership is checked through the parent course.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{parse_uuid, Database};
use crate::models::Hole;
use crate::time_utils::{format_utc_rfc3339, parse_utc_rfc3339};

/// Result of provisioning holes for an existing course.
#[derive(Debug, Clone, PartialEq)]
pub enum ProvisionOutcome {
    Created(Vec<Hole>),
    /// The course does not exist or belongs to someone else.
    CourseNotFound,
    /// The course already has this many holes; nothing was written.
    AlreadyProvisioned(usize),
}

fn row_to_hole(row: &Row) -> Result<Hole> {
    let id: String = row.get("id")?;
    let course_id: String = row.get("course_id")?;
    let hole_number: i64 = row.get("hole_number")?;
    let created_at: String = row.get("created_at")?;

    Ok(Hole {
        id: parse_uuid(&id, "hole id")?,
        course_id: parse_uuid(&course_id, "course id")?,
        hole_number: u8::try_from(hole_number)
            .with_context(|| format!("hole_number {hole_number} out of range"))?,
        created_at: parse_utc_rfc3339(&created_at, "created_at")?,
    })
}

/// Insert a batch of holes on an open connection or transaction.
pub(crate) fn insert_holes(conn: &Connection, holes: &[Hole]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO holes (id, course_id, hole_number, created_at)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for hole in holes {
        stmt.execute(params![
            hole.id.to_string(),
            hole.course_id.to_string(),
            hole.hole_number,
            format_utc_rfc3339(hole.created_at),
        ])
        .with_context(|| format!("failed to insert hole {}", hole.hole_number))?;
    }
    Ok(())
}

fn course_owned_by(conn: &Connection, user_id: Uuid, course_id: Uuid) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM golf_courses WHERE id = ?1 AND user_id = ?2",
            params![course_id.to_string(), user_id.to_string()],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

impl Database {
    /// Holes of a course owned by `user_id`, ordered by hole number.
    pub async fn list_holes(&self, user_id: Uuid, course_id: Uuid) -> Result<Vec<Hole>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT h.id, h.course_id, h.hole_number, h.created_at
                 FROM holes h
                 JOIN golf_courses c ON c.id = h.course_id
                 WHERE h.course_id = ?1 AND c.user_id = ?2
                 ORDER BY h.hole_number",
            )?;

            let mut rows = stmt.query(params![course_id.to_string(), user_id.to_string()])?;
            let mut holes = Vec::new();
            while let Some(row) = rows.next()? {
                holes.push(row_to_hole(row)?);
            }
            Ok(holes)
        })
        .await
    }

    /// A single hole, if its course belongs to `user_id`.
    pub async fn get_hole(&self, user_id: Uuid, hole_id: Uuid) -> Result<Option<Hole>> {
        self.execute(move |conn| {
            let hole = conn
                .query_row(
                    "SELECT h.id, h.course_id, h.hole_number, h.created_at
                     FROM holes h
                     JOIN golf_courses c ON c.id = h.course_id
                     WHERE h.id = ?1 AND c.user_id = ?2",
                    params![hole_id.to_string(), user_id.to_string()],
                    |row| Ok(row_to_hole(row)),
                )
                .optional()?
                .transpose()?;
            Ok(hole)
        })
        .await
    }

    /// Insert `holes` for a course that has none yet.
    ///
    /// The ownership check, the emptiness check and the inserts share one transaction.
    pub async fn provision_holes(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        holes: Vec<Hole>,
    ) -> Result<ProvisionOutcome> {
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            if !course_owned_by(&tx, user_id, course_id)? {
                return Ok(ProvisionOutcome::CourseNotFound);
            }

            let existing: i64 = tx.query_row(
                "SELECT COUNT(*) FROM holes WHERE course_id = ?1",
                params![course_id.to_string()],
                |row| row.get(0),
            )?;
            if existing > 0 {
                return Ok(ProvisionOutcome::AlreadyProvisioned(existing as usize));
            }

            insert_holes(&tx, &holes)?;
            tx.commit().context("failed to commit hole provisioning")?;
            Ok(ProvisionOutcome::Created(holes))
        })
        .await
    }
}
