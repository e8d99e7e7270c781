// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Green reading model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

/// Upper bound for any distance field, in yards.
pub const MAX_DISTANCE_YARDS: u32 = 999;

/// Which side of the green the off-line distance is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    #[default]
    Middle,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Middle => "middle",
        }
    }
}

/// Direction a putt is approached from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum ApproachDirection {
    #[default]
    Front,
    Back,
    Left,
    Right,
}

impl ApproachDirection {
    /// All four directions, in entry order.
    pub const ALL: [ApproachDirection; 4] = [
        ApproachDirection::Front,
        ApproachDirection::Back,
        ApproachDirection::Left,
        ApproachDirection::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApproachDirection::Front => "front",
            ApproachDirection::Back => "back",
            ApproachDirection::Left => "left",
            ApproachDirection::Right => "right",
        }
    }
}

/// Error for enum text that is not one of the known values.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl FromStr for Side {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            "middle" => Ok(Side::Middle),
            _ => Err(UnknownVariant {
                kind: "side",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for ApproachDirection {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "front" => Ok(ApproachDirection::Front),
            "back" => Ok(ApproachDirection::Back),
            "left" => Ok(ApproachDirection::Left),
            "right" => Ok(ApproachDirection::Right),
            _ => Err(UnknownVariant {
                kind: "approach direction",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ApproachDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored reading row (`green_readings`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GreenReading {
    pub id: Uuid,
    pub hole_id: Uuid,
    pub user_id: Uuid,
    /// Free text, e.g. "Back tier rightish"
    pub pin_position: String,
    /// Yards onto the green
    pub distance_on: u32,
    /// Yards in from `side_from`
    pub distance_from_side: u32,
    pub side_from: Side,
    pub approach_direction: ApproachDirection,
    pub break_description: String,
    /// Empty when no notes were taken
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// One reading as submitted by a client. Owner and hole come from the request context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewGreenReading {
    #[validate(length(min = 1, max = 200, message = "pin position must be 1-200 characters"))]
    pub pin_position: String,
    #[validate(range(max = 999))]
    pub distance_on: u32,
    #[validate(range(max = 999))]
    pub distance_from_side: u32,
    pub side_from: Side,
    pub approach_direction: ApproachDirection,
    #[validate(length(max = 2000))]
    pub break_description: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub notes: String,
}

/// Body of an insert-readings request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InsertReadingsRequest {
    #[validate(length(min = 1, max = 4, message = "between 1 and 4 readings per insert"), nested)]
    pub readings: Vec<NewGreenReading>,
}
