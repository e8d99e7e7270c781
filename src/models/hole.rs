//! Hole model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// Number of holes provisioned for every course.
pub const HOLES_PER_COURSE: u8 = 18;

/// Stored hole row (`holes`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Hole {
    pub id: Uuid,
    /// Owning course
    pub course_id: Uuid,
    /// 1 through 18
    pub hole_number: u8,
    pub created_at: DateTime<Utc>,
}

impl Hole {
    /// Build the full 18-hole set for a course, numbered 1..=18.
    pub fn full_set(course_id: Uuid, created_at: DateTime<Utc>) -> Vec<Hole> {
        (1..=HOLES_PER_COURSE)
            .map(|hole_number| Hole {
                id: Uuid::new_v4(),
                course_id,
                hole_number,
                created_at,
            })
            .collect()
    }
}
