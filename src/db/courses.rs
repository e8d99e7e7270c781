// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Course operations. Every query is scoped to the owning user.

use anyhow::{Context, Result};
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::holes::insert_holes;
use crate::db::{parse_uuid, Database};
use crate::models::{Course, Hole};
use crate::time_utils::{format_utc_rfc3339, parse_utc_rfc3339};

pub(crate) fn row_to_course(row: &Row) -> Result<Course> {
    let id: String = row.get("id")?;
    let user_id: String = row.get("user_id")?;
    let created_at: String = row.get("created_at")?;

    Ok(Course {
        id: parse_uuid(&id, "course id")?,
        name: row.get("name")?,
        user_id: parse_uuid(&user_id, "user id")?,
        created_at: parse_utc_rfc3339(&created_at, "created_at")?,
    })
}

impl Database {
    /// Courses owned by `user_id`, ordered by name.
    pub async fn list_courses(&self, user_id: Uuid) -> Result<Vec<Course>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, user_id, created_at
                 FROM golf_courses
                 WHERE user_id = ?1
                 ORDER BY name, created_at",
            )?;

            let mut rows = stmt.query(params![user_id.to_string()])?;
            let mut courses = Vec::new();
            while let Some(row) = rows.next()? {
                courses.push(row_to_course(row)?);
            }
            Ok(courses)
        })
        .await
    }

    /// A single course, if it exists and belongs to `user_id`.
    pub async fn get_course(&self, user_id: Uuid, course_id: Uuid) -> Result<Option<Course>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, user_id, created_at
                 FROM golf_courses
                 WHERE id = ?1 AND user_id = ?2",
            )?;

            let mut rows = stmt.query(params![course_id.to_string(), user_id.to_string()])?;
            let course = match rows.next()? {
                Some(row) => Some(row_to_course(row)?),
                None => None,
            };
            Ok(course)
        })
        .await
    }

    /// Insert a course and its holes in one transaction: both land or neither does.
    pub async fn create_course_with_holes(&self, course: &Course, holes: &[Hole]) -> Result<()> {
        let course = course.clone();
        let holes = holes.to_vec();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO golf_courses (id, name, user_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    course.id.to_string(),
                    course.name,
                    course.user_id.to_string(),
                    format_utc_rfc3339(course.created_at),
                ],
            )
            .context("failed to insert course")?;
            insert_holes(&tx, &holes)?;
            tx.commit().context("failed to commit course creation")?;
            Ok(())
        })
        .await
    }
}
