// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Course and hole routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

use crate::db::ProvisionOutcome;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Course, Hole, NewCourse};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/courses", get(list_courses).post(create_course))
        .route(
            "/api/courses/{course_id}/holes",
            get(list_holes).post(provision_holes),
        )
}

/// A newly created course together with its holes.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreateCourseResponse {
    pub course: Course,
    pub holes: Vec<Hole>,
}

async fn list_courses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Course>>> {
    let courses = state
        .db
        .list_courses(user.user_id)
        .await
        .map_err(AppError::from_db)?;
    Ok(Json(courses))
}

/// Create a course and its full set of holes in one transaction.
async fn create_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<NewCourse>,
) -> Result<(StatusCode, Json<CreateCourseResponse>)> {
    let body = body.normalized();
    body.validate()?;

    let now = Utc::now();
    let course = Course {
        id: Uuid::new_v4(),
        name: body.name,
        user_id: user.user_id,
        created_at: now,
    };
    let holes = Hole::full_set(course.id, now);

    state
        .db
        .create_course_with_holes(&course, &holes)
        .await
        .map_err(AppError::from_db)?;

    tracing::info!(
        user_id = %user.user_id,
        course_id = %course.id,
        holes = holes.len(),
        "Course created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateCourseResponse { course, holes }),
    ))
}

async fn list_holes(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Vec<Hole>>> {
    // An empty list is ambiguous, so confirm the course is visible first.
    state
        .db
        .get_course(user.user_id, course_id)
        .await
        .map_err(AppError::from_db)?
        .ok_or_else(|| AppError::NotFound(format!("course {course_id}")))?;

    let holes = state
        .db
        .list_holes(user.user_id, course_id)
        .await
        .map_err(AppError::from_db)?;
    Ok(Json(holes))
}

/// Generate holes for a course that has none.
async fn provision_holes(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(course_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Vec<Hole>>)> {
    let holes = Hole::full_set(course_id, Utc::now());

    let outcome = state
        .db
        .provision_holes(user.user_id, course_id, holes)
        .await
        .map_err(AppError::from_db)?;

    match outcome {
        ProvisionOutcome::Created(holes) => {
            tracing::info!(course_id = %course_id, holes = holes.len(), "Holes provisioned");
            Ok((StatusCode::CREATED, Json(holes)))
        }
        ProvisionOutcome::CourseNotFound => {
            Err(AppError::NotFound(format!("course {course_id}")))
        }
        ProvisionOutcome::AlreadyProvisioned(count) => Err(AppError::Conflict(format!(
            "course already has {count} holes"
        ))),
    }
}
