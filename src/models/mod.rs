// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod course;
pub mod hole;
pub mod reading;
pub mod user;

pub use course::{Course, NewCourse};
pub use hole::{Hole, HOLES_PER_COURSE};
pub use reading::{
    ApproachDirection, GreenReading, InsertReadingsRequest, NewGreenReading, Side,
    MAX_DISTANCE_YARDS,
};
pub use user::{AuthSession, Credentials, User, UserRecord};
