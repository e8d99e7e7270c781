// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client library: view state for the green-reading workflow.
//!
//! Views are plain structs driven through async methods that take a
//! [`Backend`]. They hold no locks and share nothing except the capture
//! signal between the forms and the reading browser.

pub mod auth_form;
pub mod backend;
pub mod browser;
pub mod capture;
pub mod dashboard;
pub mod selector;
pub mod session;

pub use auth_form::{AuthMode, CredentialForm};
pub use backend::{AuthEvent, Backend, ClientError, HttpBackend};
pub use browser::{filter_readings, ReadingBrowser};
pub use capture::{CaptureSignal, PinFields, QuadForm, SingleEntryForm, WizardForm, WizardStep};
pub use dashboard::{CaptureMode, Dashboard};
pub use selector::CourseSelector;
pub use session::{sign_out, SessionGate, SignOutReport, View};
