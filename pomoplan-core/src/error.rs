//! Error types for pomoplan-core.
//!
//! The `Display` text of every variant is the message shown to the user, so
//! callers can report a failed operation and carry on with the next one.

use chrono::NaiveDate;
use thiserror::Error;

/// Top-level error returned by every fallible core operation.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Task '{name}' not found.")]
    NotFound { name: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PlanError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}

/// Input rejected at the boundary. Nothing was mutated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Task name must not be empty.")]
    EmptyName,

    #[error("Invalid date '{input}'. Use YYYY-MM-DD.")]
    InvalidDate { input: String },

    #[error("Due date {due} is in the past (today is {today}).")]
    DueDateInPast { due: NaiveDate, today: NaiveDate },

    #[error("Task '{name}' already exists!")]
    DuplicateName { name: String },

    #[error("Estimated blocks must be at least 1 (got {given}).")]
    NonPositiveEstimate { given: i64 },

    #[error("Estimated blocks must be at most {max} (got {given}).")]
    EstimateTooLarge { given: i64, max: u32 },

    #[error("Invalid time window {start}-{end}. Hours must lie within 0-24.")]
    InvalidWindow { start: f64, end: f64 },
}

/// Failure reported by a persistence collaborator.
#[derive(Error, Debug)]
#[error("{context}: {source}")]
pub struct StorageError {
    pub context: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl StorageError {
    pub fn new(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
        }
    }
}
