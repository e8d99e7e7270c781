// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Green reading operations.

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{parse_uuid, Database};
use crate::models::GreenReading;
use crate::time_utils::{format_utc_rfc3339, parse_utc_rfc3339};

fn row_to_reading(row: &Row) -> Result<GreenReading> {
    let id: String = row.get("id")?;
    let hole_id: String = row.get("hole_id")?;
    let user_id: String = row.get("user_id")?;
    let side_from: String = row.get("side_from")?;
    let approach_direction: String = row.get("approach_direction")?;
    let created_at: String = row.get("created_at")?;

    Ok(GreenReading {
        id: parse_uuid(&id, "reading id")?,
        hole_id: parse_uuid(&hole_id, "hole id")?,
        user_id: parse_uuid(&user_id, "user id")?,
        pin_position: row.get("pin_position")?,
        distance_on: row.get("distance_on")?,
        distance_from_side: row.get("distance_from_side")?,
        side_from: side_from.parse().map_err(|e| anyhow!("{e}"))?,
        approach_direction: approach_direction.parse().map_err(|e| anyhow!("{e}"))?,
        break_description: row.get("break_description")?,
        notes: row.get("notes")?,
        created_at: parse_utc_rfc3339(&created_at, "created_at")?,
    })
}

impl Database {
    /// Readings on a hole recorded by `user_id`, newest first.
    pub async fn list_readings(&self, user_id: Uuid, hole_id: Uuid) -> Result<Vec<GreenReading>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, hole_id, user_id, pin_position, distance_on, distance_from_side,
                        side_from, approach_direction, break_description, notes, created_at
                 FROM green_readings
                 WHERE hole_id = ?1 AND user_id = ?2
                 ORDER BY created_at DESC, rowid DESC",
            )?;

            let mut rows = stmt.query(params![hole_id.to_string(), user_id.to_string()])?;
            let mut readings = Vec::new();
            while let Some(row) = rows.next()? {
                readings.push(row_to_reading(row)?);
            }
            Ok(readings)
        })
        .await
    }

    /// Insert a batch of readings on one hole.
    ///
    /// Returns `false` without writing anything when the hole's course is not
    /// owned by `user_id`. Rows must already carry `hole_id` and `user_id`.
    pub async fn insert_readings(
        &self,
        user_id: Uuid,
        hole_id: Uuid,
        readings: Vec<GreenReading>,
    ) -> Result<bool> {
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            let owned = tx
                .query_row(
                    "SELECT 1 FROM holes h
                     JOIN golf_courses c ON c.id = h.course_id
                     WHERE h.id = ?1 AND c.user_id = ?2",
                    params![hole_id.to_string(), user_id.to_string()],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if !owned {
                return Ok(false);
            }

            {
                let mut stmt = tx.prepare(
                    "INSERT INTO green_readings (
                        id, hole_id, user_id, pin_position, distance_on, distance_from_side,
                        side_from, approach_direction, break_description, notes, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                )?;
                for reading in &readings {
                    if reading.hole_id != hole_id || reading.user_id != user_id {
                        return Err(anyhow!("reading {} does not match its hole or owner", reading.id));
                    }
                    stmt.execute(params![
                        reading.id.to_string(),
                        reading.hole_id.to_string(),
                        reading.user_id.to_string(),
                        reading.pin_position,
                        reading.distance_on,
                        reading.distance_from_side,
                        reading.side_from.as_str(),
                        reading.approach_direction.as_str(),
                        reading.break_description,
                        reading.notes,
                        format_utc_rfc3339(reading.created_at),
                    ])
                    .context("failed to insert green reading")?;
                }
            }

            tx.commit().context("failed to commit green readings")?;
            Ok(true)
        })
        .await
    }
}
