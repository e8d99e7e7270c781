// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Green reading routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{GreenReading, InsertReadingsRequest};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/holes/{hole_id}/readings",
        get(list_readings).post(insert_readings),
    )
}

async fn list_readings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(hole_id): Path<Uuid>,
) -> Result<Json<Vec<GreenReading>>> {
    state
        .db
        .get_hole(user.user_id, hole_id)
        .await
        .map_err(AppError::from_db)?
        .ok_or_else(|| AppError::NotFound(format!("hole {hole_id}")))?;

    let readings = state
        .db
        .list_readings(user.user_id, hole_id)
        .await
        .map_err(AppError::from_db)?;
    Ok(Json(readings))
}

/// Record one to four readings on a hole. All rows share one timestamp.
async fn insert_readings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(hole_id): Path<Uuid>,
    Json(mut body): Json<InsertReadingsRequest>,
) -> Result<(StatusCode, Json<Vec<GreenReading>>)> {
    for reading in &mut body.readings {
        reading.pin_position = reading.pin_position.trim().to_string();
    }
    body.validate()?;

    let now = Utc::now();
    let rows: Vec<GreenReading> = body
        .readings
        .into_iter()
        .map(|r| GreenReading {
            id: Uuid::new_v4(),
            hole_id,
            user_id: user.user_id,
            pin_position: r.pin_position,
            distance_on: r.distance_on,
            distance_from_side: r.distance_from_side,
            side_from: r.side_from,
            approach_direction: r.approach_direction,
            break_description: r.break_description,
            notes: r.notes,
            created_at: now,
        })
        .collect();

    let inserted = state
        .db
        .insert_readings(user.user_id, hole_id, rows.clone())
        .await
        .map_err(AppError::from_db)?;

    if !inserted {
        return Err(AppError::NotFound(format!("hole {hole_id}")));
    }

    tracing::info!(
        user_id = %user.user_id,
        hole_id = %hole_id,
        count = rows.len(),
        "Green readings recorded"
    );

    Ok((StatusCode::CREATED, Json(rows)))
}
