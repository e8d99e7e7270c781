// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Main view: selector, capture forms and reading list.

use uuid::Uuid;

use crate::client::backend::{Backend, ClientError};
use crate::client::browser::ReadingBrowser;
use crate::client::capture::{CaptureSignal, QuadForm, SingleEntryForm, WizardForm};
use crate::client::selector::CourseSelector;
use crate::client::session::{SessionGate, SignOutReport};
use crate::models::GreenReading;

/// Which capture layout is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureMode {
    #[default]
    Quad,
    Wizard,
}

#[derive(Debug)]
pub struct Dashboard {
    pub selector: CourseSelector,
    pub mode: CaptureMode,
    pub quad: QuadForm,
    pub wizard: WizardForm,
    pub single: SingleEntryForm,
    pub browser: ReadingBrowser,
    signal: CaptureSignal,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        let signal = CaptureSignal::new();
        Self {
            selector: CourseSelector::new(),
            mode: CaptureMode::default(),
            quad: QuadForm::new(),
            wizard: WizardForm::new(),
            single: SingleEntryForm::new(),
            browser: ReadingBrowser::new(signal.subscribe()),
            signal,
        }
    }

    pub fn signal(&self) -> &CaptureSignal {
        &self.signal
    }

    /// Initial load: courses, then the first course's holes.
    pub async fn mount<B: Backend>(&mut self, backend: &B) -> Result<(), ClientError> {
        self.selector.load(backend).await?;
        self.sync_browser(backend).await
    }

    /// Point the browser at the selector's hole, refetching if it changed.
    pub async fn sync_browser<B: Backend>(&mut self, backend: &B) -> Result<(), ClientError> {
        let hole = self.selector.selected_hole_id();
        self.browser.set_hole(backend, hole).await
    }

    pub async fn select_course<B: Backend>(
        &mut self,
        backend: &B,
        course_id: Option<Uuid>,
    ) -> Result<(), ClientError> {
        self.selector.select_course(backend, course_id).await?;
        self.sync_browser(backend).await
    }

    pub async fn select_hole<B: Backend>(
        &mut self,
        backend: &B,
        hole_id: Option<Uuid>,
    ) -> Result<(), ClientError> {
        self.selector.select_hole(hole_id);
        self.sync_browser(backend).await
    }

    pub async fn next_hole<B: Backend>(&mut self, backend: &B) -> Result<(), ClientError> {
        self.selector.next_hole();
        self.sync_browser(backend).await
    }

    pub async fn previous_hole<B: Backend>(&mut self, backend: &B) -> Result<(), ClientError> {
        self.selector.previous_hole();
        self.sync_browser(backend).await
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            CaptureMode::Quad => CaptureMode::Wizard,
            CaptureMode::Wizard => CaptureMode::Quad,
        };
    }

    fn require_hole(&self) -> Result<Uuid, ClientError> {
        self.selector
            .selected_hole_id()
            .ok_or_else(|| ClientError::Validation("no hole selected".to_string()))
    }

    /// Submit whichever multi-direction form the current mode shows.
    pub async fn submit_capture<B: Backend>(
        &mut self,
        backend: &B,
    ) -> Result<Vec<GreenReading>, ClientError> {
        let hole_id = self.require_hole()?;
        let saved = match self.mode {
            CaptureMode::Quad => self.quad.submit(backend, hole_id, &self.signal).await?,
            CaptureMode::Wizard => self.wizard.submit(backend, hole_id, &self.signal).await?,
        };
        self.refresh_after_capture(backend).await;
        Ok(saved)
    }

    pub async fn submit_single<B: Backend>(
        &mut self,
        backend: &B,
    ) -> Result<Vec<GreenReading>, ClientError> {
        let hole_id = self.require_hole()?;
        let saved = self.single.submit(backend, hole_id, &self.signal).await?;
        self.refresh_after_capture(backend).await;
        Ok(saved)
    }

    /// The rows are saved either way; a failed refetch stays on the browser.
    async fn refresh_after_capture<B: Backend>(&mut self, backend: &B) {
        let _ = self.browser.refresh_if_captured(backend).await;
    }

    /// Sign out through the gate and drop everything loaded for the old user.
    pub async fn sign_out<B: Backend>(
        &mut self,
        backend: &B,
        gate: &mut SessionGate,
    ) -> SignOutReport {
        let report = gate.sign_out(backend).await;
        *self = Self::new();
        report
    }
}
