// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod password;
pub mod sessions;

pub use password::{hash_password, verify_password, verify_password_or_placeholder};
pub use sessions::SessionService;
