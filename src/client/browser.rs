// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reading list for the active hole with pin-position search.

use tokio::sync::watch;
use uuid::Uuid;

use crate::client::backend::{Backend, ClientError};
use crate::models::GreenReading;

/// Readings whose pin position contains `search`, ignoring case.
pub fn filter_readings<'a>(readings: &'a [GreenReading], search: &str) -> Vec<&'a GreenReading> {
    let needle = search.to_lowercase();
    readings
        .iter()
        .filter(|r| r.pin_position.to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug)]
pub struct ReadingBrowser {
    hole_id: Option<Uuid>,
    readings: Vec<GreenReading>,
    pub search: String,
    loading: bool,
    captures: watch::Receiver<()>,
    last_error: Option<String>,
}

impl ReadingBrowser {
    /// `captures` comes from [`crate::client::capture::CaptureSignal::subscribe`].
    pub fn new(captures: watch::Receiver<()>) -> Self {
        Self {
            hole_id: None,
            readings: Vec::new(),
            search: String::new(),
            loading: false,
            captures,
            last_error: None,
        }
    }

    pub fn hole_id(&self) -> Option<Uuid> {
        self.hole_id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn readings(&self) -> &[GreenReading] {
        &self.readings
    }

    pub fn visible(&self) -> Vec<&GreenReading> {
        filter_readings(&self.readings, &self.search)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Text shown when nothing is visible.
    pub fn empty_message(&self) -> Option<&'static str> {
        if !self.visible().is_empty() {
            return None;
        }
        if self.search.is_empty() {
            Some("No green readings recorded yet")
        } else {
            Some("No readings match your search")
        }
    }

    /// Point at another hole and fetch its readings.
    pub async fn set_hole<B: Backend>(
        &mut self,
        backend: &B,
        hole_id: Option<Uuid>,
    ) -> Result<(), ClientError> {
        if self.hole_id == hole_id {
            return Ok(());
        }
        self.hole_id = hole_id;
        self.readings.clear();
        self.refresh(backend).await
    }

    /// Fetch readings for the current hole, newest first.
    pub async fn refresh<B: Backend>(&mut self, backend: &B) -> Result<(), ClientError> {
        // Whatever is fetched now includes any capture signalled so far.
        self.captures.borrow_and_update();

        let Some(hole_id) = self.hole_id else {
            self.readings.clear();
            return Ok(());
        };

        self.loading = true;
        let result = backend.list_readings(hole_id).await;
        self.loading = false;

        match result {
            Ok(readings) => {
                self.readings = readings;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, hole_id = %hole_id, "Loading readings failed");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Refetch if a capture completed since the last fetch. Returns whether it did.
    pub async fn refresh_if_captured<B: Backend>(
        &mut self,
        backend: &B,
    ) -> Result<bool, ClientError> {
        if !self.captures.has_changed().unwrap_or(false) {
            return Ok(false);
        }
        self.refresh(backend).await?;
        Ok(true)
    }
}
