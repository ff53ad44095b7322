//! Page-level error collector.
//!
//! Queries report failures here instead of failing the whole view; the page
//! renders whatever has been collected.

use crate::error::AppError;
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Errors collected for the current page. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct PageErrors {
    errors: Arc<Mutex<Vec<CollectedError>>>,
}

/// Snapshot of a collected error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectedError {
    pub message: String,
    pub status_code: Option<u16>,
}

impl PageErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error unless an equal one is already collected.
    ///
    /// Returns whether the error was added.
    pub fn add(&self, error: &AppError) -> bool {
        let entry = CollectedError {
            message: error.to_string(),
            status_code: error.status_code(),
        };
        let mut errors = match self.errors.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if errors.contains(&entry) {
            return false;
        }
        log::debug!("collected page error: {}", entry.message);
        errors.push(entry);
        true
    }

    pub fn all(&self) -> Vec<CollectedError> {
        match self.errors.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.all().is_empty()
    }

    /// Forget collected errors, e.g. when leaving the page.
    pub fn clear(&self) {
        match self.errors.lock() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}
