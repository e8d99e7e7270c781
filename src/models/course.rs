// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Golf course model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

/// Stored course row (`golf_courses`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Course {
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Owning user
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Body of a create-course request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCourse {
    #[validate(length(min = 1, max = 100, message = "course name must be 1-100 characters"))]
    pub name: String,
}

impl NewCourse {
    /// Trim the name; surrounding whitespace never reaches storage.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
        }
    }
}
