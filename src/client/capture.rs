// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reading capture forms.
//!
//! Three layouts share the same pin fields: a single-direction form, a
//! two-step wizard covering all four approach directions, and a one-page
//! quad form. Each validates locally, requires a signed-in user, inserts its
//! rows in one request and then resets itself and fires the capture signal.

use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

use crate::client::backend::{Backend, ClientError};
use crate::models::{ApproachDirection, GreenReading, NewGreenReading, Side, MAX_DISTANCE_YARDS};

/// Fired after every successful capture. Carries no data.
#[derive(Debug, Clone)]
pub struct CaptureSignal(Arc<watch::Sender<()>>);

impl Default for CaptureSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(());
        Self(Arc::new(tx))
    }

    pub fn notify(&self) {
        self.0.send_replace(());
    }

    pub fn subscribe(&self) -> watch::Receiver<()> {
        self.0.subscribe()
    }
}

/// Pin position, distances and side, as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinFields {
    pub pin_position: String,
    /// Yards onto the green
    pub distance_on: String,
    /// Yards in from `side_from`
    pub distance_from_side: String,
    pub side_from: Side,
}

struct ParsedPin {
    pin_position: String,
    distance_on: u32,
    distance_from_side: u32,
    side_from: Side,
}

impl ParsedPin {
    fn reading(
        &self,
        approach_direction: ApproachDirection,
        break_description: &str,
        notes: &str,
    ) -> NewGreenReading {
        NewGreenReading {
            pin_position: self.pin_position.clone(),
            distance_on: self.distance_on,
            distance_from_side: self.distance_from_side,
            side_from: self.side_from,
            approach_direction,
            break_description: break_description.trim().to_string(),
            notes: notes.trim().to_string(),
        }
    }
}

fn parse_yards(value: &str, field: &str) -> Result<u32, ClientError> {
    let yards: u32 = value.trim().parse().map_err(|_| {
        ClientError::Validation(format!("{field} must be a whole number of yards"))
    })?;
    if yards > MAX_DISTANCE_YARDS {
        return Err(ClientError::Validation(format!(
            "{field} must be at most {MAX_DISTANCE_YARDS} yards"
        )));
    }
    Ok(yards)
}

impl PinFields {
    /// True when pin position and both distances have been filled in.
    pub fn is_complete(&self) -> bool {
        !self.pin_position.trim().is_empty()
            && !self.distance_on.trim().is_empty()
            && !self.distance_from_side.trim().is_empty()
    }

    fn parse(&self) -> Result<ParsedPin, ClientError> {
        let pin_position = self.pin_position.trim();
        if pin_position.is_empty() {
            return Err(ClientError::Validation("pin position is required".to_string()));
        }
        Ok(ParsedPin {
            pin_position: pin_position.to_string(),
            distance_on: parse_yards(&self.distance_on, "distance on")?,
            distance_from_side: parse_yards(&self.distance_from_side, "distance from side")?,
            side_from: self.side_from,
        })
    }
}

/// Insert rows for the signed-in user. Nothing is written without one.
async fn insert_for_current_user<B: Backend>(
    backend: &B,
    hole_id: Uuid,
    rows: Vec<NewGreenReading>,
) -> Result<Vec<GreenReading>, ClientError> {
    if backend.current_user().await?.is_none() {
        return Err(ClientError::NotAuthenticated);
    }
    backend.insert_readings(hole_id, rows).await
}

fn note_failure(slot: &mut Option<String>, form: &str, err: &ClientError) {
    tracing::warn!(error = %err, form, "Saving green readings failed");
    *slot = Some(err.to_string());
}

// ─── Single entry ────────────────────────────────────────────

/// One reading for one approach direction.
#[derive(Debug, Default)]
pub struct SingleEntryForm {
    pub pin: PinFields,
    pub approach_direction: ApproachDirection,
    pub break_description: String,
    pub notes: String,
    last_error: Option<String>,
}

impl SingleEntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn readings(&self) -> Result<Vec<NewGreenReading>, ClientError> {
        let pin = self.pin.parse()?;
        if self.break_description.trim().is_empty() {
            return Err(ClientError::Validation(
                "break description is required".to_string(),
            ));
        }
        Ok(vec![pin.reading(
            self.approach_direction,
            &self.break_description,
            &self.notes,
        )])
    }

    pub async fn submit<B: Backend>(
        &mut self,
        backend: &B,
        hole_id: Uuid,
        signal: &CaptureSignal,
    ) -> Result<Vec<GreenReading>, ClientError> {
        let result = match self.readings() {
            Ok(rows) => insert_for_current_user(backend, hole_id, rows).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(saved) => {
                *self = Self::default();
                signal.notify();
                Ok(saved)
            }
            Err(e) => {
                note_failure(&mut self.last_error, "single", &e);
                Err(e)
            }
        }
    }
}

// ─── Wizard ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    /// Pin position, distances, side
    #[default]
    Pin,
    /// Break and notes per direction
    Breaks,
}

/// Break and notes for one approach direction.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionEntry {
    pub approach: ApproachDirection,
    pub break_description: String,
    pub notes: String,
}

fn blank_directions() -> [DirectionEntry; 4] {
    ApproachDirection::ALL.map(|approach| DirectionEntry {
        approach,
        break_description: String::new(),
        notes: String::new(),
    })
}

/// Two-step form producing one reading per approach direction.
#[derive(Debug)]
pub struct WizardForm {
    pub pin: PinFields,
    step: WizardStep,
    directions: [DirectionEntry; 4],
    last_error: Option<String>,
}

impl Default for WizardForm {
    fn default() -> Self {
        Self {
            pin: PinFields::default(),
            step: WizardStep::Pin,
            directions: blank_directions(),
            last_error: None,
        }
    }
}

impl WizardForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn step_label(&self) -> String {
        let n = match self.step {
            WizardStep::Pin => 1,
            WizardStep::Breaks => 2,
        };
        format!("Step {n} of 2")
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// "Next" is enabled once pin position and both distances are filled in.
    pub fn can_advance(&self) -> bool {
        self.pin.is_complete()
    }

    /// Move to step 2. Returns whether the step changed.
    pub fn advance(&mut self) -> bool {
        if self.step == WizardStep::Pin && self.can_advance() {
            self.step = WizardStep::Breaks;
            return true;
        }
        false
    }

    /// Back to step 1; entered values are kept.
    pub fn back(&mut self) {
        self.step = WizardStep::Pin;
    }

    pub fn directions(&self) -> &[DirectionEntry; 4] {
        &self.directions
    }

    pub fn direction_mut(&mut self, approach: ApproachDirection) -> &mut DirectionEntry {
        let index = ApproachDirection::ALL
            .iter()
            .position(|d| *d == approach)
            .unwrap_or_default();
        &mut self.directions[index]
    }

    /// Four rows in front, back, left, right order sharing the pin fields.
    pub fn readings(&self) -> Result<Vec<NewGreenReading>, ClientError> {
        let pin = self.pin.parse()?;
        Ok(self
            .directions
            .iter()
            .map(|d| pin.reading(d.approach, &d.break_description, &d.notes))
            .collect())
    }

    pub async fn submit<B: Backend>(
        &mut self,
        backend: &B,
        hole_id: Uuid,
        signal: &CaptureSignal,
    ) -> Result<Vec<GreenReading>, ClientError> {
        let result = if self.step != WizardStep::Breaks {
            Err(ClientError::Validation(
                "complete the pin step before saving".to_string(),
            ))
        } else {
            match self.readings() {
                Ok(rows) => insert_for_current_user(backend, hole_id, rows).await,
                Err(e) => Err(e),
            }
        };
        match result {
            Ok(saved) => {
                *self = Self::default();
                signal.notify();
                Ok(saved)
            }
            Err(e) => {
                note_failure(&mut self.last_error, "wizard", &e);
                Err(e)
            }
        }
    }
}

// ─── Quad ────────────────────────────────────────────────────

/// One-page form: shared pin fields plus a break text per direction.
#[derive(Debug, Default)]
pub struct QuadForm {
    pub pin: PinFields,
    /// Indexed like [`ApproachDirection::ALL`]
    breaks: [String; 4],
    last_error: Option<String>,
}

impl QuadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn break_mut(&mut self, approach: ApproachDirection) -> &mut String {
        let index = ApproachDirection::ALL
            .iter()
            .position(|d| *d == approach)
            .unwrap_or_default();
        &mut self.breaks[index]
    }

    /// Exactly four rows with empty notes, differing only in direction and break.
    pub fn readings(&self) -> Result<Vec<NewGreenReading>, ClientError> {
        let pin = self.pin.parse()?;
        Ok(ApproachDirection::ALL
            .iter()
            .zip(&self.breaks)
            .map(|(approach, brk)| pin.reading(*approach, brk, ""))
            .collect())
    }

    pub async fn submit<B: Backend>(
        &mut self,
        backend: &B,
        hole_id: Uuid,
        signal: &CaptureSignal,
    ) -> Result<Vec<GreenReading>, ClientError> {
        let result = match self.readings() {
            Ok(rows) => insert_for_current_user(backend, hole_id, rows).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(saved) => {
                *self = Self::default();
                signal.notify();
                Ok(saved)
            }
            Err(e) => {
                note_failure(&mut self.last_error, "quad", &e);
                Err(e)
            }
        }
    }
}
