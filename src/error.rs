//! Error taxonomy shared by the feature stores.
//!
//! - Field-level problems are data ([`ValidationError`]) and are returned,
//!   never raised.
//! - Store actions fail with [`StoreError`]; the store records the message in
//!   its state and in an [`ErrorRegistry`] before handing the error back.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persist::PersistError;

/// One field-level validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Join validation messages into one human-readable line.
pub fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors returned by store actions.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Cannot {action} '{id}' while it is {from}")]
    InvalidTransition {
        id: String,
        from: String,
        action: &'static str,
    },

    #[error("Validation errors: {summary}")]
    Validation {
        summary: String,
        errors: Vec<ValidationError>,
    },

    #[error("Variant '{variant_id}' does not belong to test '{test_id}'")]
    UnknownVariant { test_id: String, variant_id: String },

    #[error("Bulk action stopped at '{failed_id}' after {completed} item(s): {source}")]
    Bulk {
        completed: usize,
        failed_id: String,
        #[source]
        source: Box<StoreError>,
    },

    #[error("Unsupported action: {0}")]
    Unsupported(String),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn validation(errors: Vec<ValidationError>) -> Self {
        Self::Validation {
            summary: summarize(&errors),
            errors,
        }
    }
}

/// Errors from writing export bundles.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to serialize export: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write export to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A recorded action failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEntry {
    pub timestamp: DateTime<Utc>,
    pub source: &'static str,
    pub message: String,
}

/// Bounded log of recent action failures.
///
/// Keeps the newest `capacity` entries; older ones are dropped.
pub struct ErrorRegistry {
    capacity: usize,
    entries: Mutex<VecDeque<ErrorEntry>>,
}

impl ErrorRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    pub fn record(&self, timestamp: DateTime<Utc>, source: &'static str, message: String) {
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(ErrorEntry {
            timestamp,
            source,
            message,
        });
    }

    /// Entries from oldest to newest.
    pub fn entries(&self) -> Vec<ErrorEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn last(&self) -> Option<ErrorEntry> {
        self.entries.lock().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for ErrorRegistry {
    fn default() -> Self {
        Self::new(100)
    }
}
