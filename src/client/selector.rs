// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Course and hole selection.

use uuid::Uuid;

use crate::client::backend::{Backend, ClientError};
use crate::models::{Course, Hole};

/// Holes offered as quick-jump buttons.
pub const QUICK_JUMP_HOLES: usize = 9;

#[derive(Debug, Default)]
pub struct CourseSelector {
    courses: Vec<Course>,
    selected_course: Option<Uuid>,
    holes: Vec<Hole>,
    selected_hole: Option<Uuid>,
    current_index: usize,
    /// Text of the "add course" input
    pub new_course_name: String,
    last_error: Option<String>,
}

impl CourseSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    pub fn selected_course(&self) -> Option<&Course> {
        let id = self.selected_course?;
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn selected_course_id(&self) -> Option<Uuid> {
        self.selected_course
    }

    pub fn selected_hole_id(&self) -> Option<Uuid> {
        self.selected_hole
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_hole(&self) -> Option<&Hole> {
        self.selected_hole?;
        self.holes.get(self.current_index)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn record<T>(&mut self, what: &str, result: Result<T, ClientError>) -> Result<T, ClientError> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(error = %e, "{what} failed");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetch courses; auto-select the first when nothing is selected yet.
    pub async fn load<B: Backend>(&mut self, backend: &B) -> Result<(), ClientError> {
        let courses = backend.list_courses().await;
        self.courses = self.record("Loading courses", courses)?;

        if self.selected_course.is_none() {
            if let Some(first) = self.courses.first().map(|c| c.id) {
                tracing::debug!(course_id = %first, "Auto-selecting first course");
                self.select_course(backend, Some(first)).await?;
            }
        }
        Ok(())
    }

    /// Switch course. The hole selection and step index always reset.
    pub async fn select_course<B: Backend>(
        &mut self,
        backend: &B,
        course_id: Option<Uuid>,
    ) -> Result<(), ClientError> {
        self.selected_course = course_id.filter(|id| self.courses.iter().any(|c| c.id == *id));
        self.selected_hole = None;
        self.current_index = 0;
        self.holes.clear();

        self.refresh_holes(backend).await
    }

    async fn refresh_holes<B: Backend>(&mut self, backend: &B) -> Result<(), ClientError> {
        let Some(course_id) = self.selected_course else {
            return Ok(());
        };
        let holes = backend.list_holes(course_id).await;
        self.holes = self.record("Loading holes", holes)?;
        Ok(())
    }

    /// Create a course from `new_course_name` and select it.
    pub async fn create_course<B: Backend>(&mut self, backend: &B) -> Result<Course, ClientError> {
        let name = self.new_course_name.trim().to_string();
        if name.is_empty() {
            let err = ClientError::Validation("course name is required".to_string());
            self.last_error = Some(err.to_string());
            return Err(err);
        }

        let created = backend.create_course(&name).await;
        let (course, holes) = self.record("Creating course", created)?;
        tracing::info!(course_id = %course.id, holes = holes.len(), "Course created");
        self.new_course_name.clear();

        let courses = backend.list_courses().await;
        self.courses = self.record("Loading courses", courses)?;
        self.select_course(backend, Some(course.id)).await?;
        Ok(course)
    }

    /// Generate the 18 holes of the selected course.
    pub async fn provision_holes<B: Backend>(&mut self, backend: &B) -> Result<(), ClientError> {
        let Some(course_id) = self.selected_course else {
            let err = ClientError::Validation("no course selected".to_string());
            self.last_error = Some(err.to_string());
            return Err(err);
        };

        let provisioned = backend.provision_holes(course_id).await;
        self.record("Provisioning holes", provisioned)?;
        self.refresh_holes(backend).await
    }

    /// Select from the list. An unknown id clears the selection.
    pub fn select_hole(&mut self, hole_id: Option<Uuid>) {
        match hole_id.and_then(|id| self.holes.iter().position(|h| h.id == id)) {
            Some(index) => self.set_index(index),
            None => {
                self.selected_hole = None;
                self.current_index = 0;
            }
        }
    }

    /// Quick-jump buttons cover the first nine holes.
    pub fn quick_jump_holes(&self) -> &[Hole] {
        &self.holes[..self.holes.len().min(QUICK_JUMP_HOLES)]
    }

    pub fn jump_to(&mut self, index: usize) {
        if index < self.quick_jump_holes().len() {
            self.set_index(index);
        }
    }

    pub fn next_hole(&mut self) {
        if !self.holes.is_empty() && self.current_index < self.holes.len() - 1 {
            self.set_index(self.current_index + 1);
        }
    }

    pub fn previous_hole(&mut self) {
        if !self.holes.is_empty() && self.current_index > 0 {
            self.set_index(self.current_index - 1);
        }
    }

    fn set_index(&mut self, index: usize) {
        self.current_index = index;
        self.selected_hole = self.holes.get(index).map(|h| h.id);
    }

    /// "Hole N of M", once a hole is selected.
    pub fn progress_label(&self) -> Option<String> {
        let hole = self.current_hole()?;
        Some(format!("Hole {} of {}", hole.hole_number, self.holes.len()))
    }
}
