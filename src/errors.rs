//! Unified error types for the staffing service.
//!
//! Core functions return [`Result`]; the API layer maps each variant onto an HTTP status.

use thiserror::Error;

/// A single field-level validation failure, reported back to API callers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    /// Name of the offending field as it appears on the wire
    pub field: String,
    /// Human-readable reason
    pub message: String,
}

impl FieldError {
    /// Builds a field error from anything string-like.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every error the crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation failed: {} field error(s)", errors.len())]
    Validation { errors: Vec<FieldError> },

    #[error("Invalid allocation: {allocation} (must be between 0 and 100)")]
    InvalidAllocation { allocation: f64 },

    #[error("Invalid probability: {probability} (must be between 0 and 100)")]
    InvalidProbability { probability: i32 },

    #[error("End date {end} is before start date {start}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Opportunity not found: {id}")]
    OpportunityNotFound { id: String },

    #[error("Role not found: {id}")]
    RoleNotFound { id: String },

    #[error("Employee not found: {id}")]
    EmployeeNotFound { id: String },

    #[error("Employee already exists: {id}")]
    EmployeeExists { id: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {message}")]
    Server { message: String },
}

impl Error {
    /// Shorthand for a validation error on a single field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            errors: vec![FieldError::new(field, message)],
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
