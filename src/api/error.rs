//! HTTP error mapping.
//!
//! Every handler returns [`ApiError`] on failure. Client mistakes keep their detail;
//! anything internal is logged and replaced by a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{
    core::permissions::{Permission, UserRole},
    errors::{Error, FieldError},
};

/// Message returned for internal failures that have no more specific wording.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Failure of an HTTP handler, rendered as `{ "error": ..., "details"?: [...] }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing or unknown user role")]
    Unauthorized,

    #[error("Role '{role}' is not allowed to {permission:?}")]
    Forbidden {
        role: UserRole,
        permission: Permission,
    },

    #[error("Validation failed")]
    Validation { errors: Vec<FieldError> },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    Internal { message: String },
}

impl ApiError {
    /// Internal error with a public message; the cause should already be logged.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        match value {
            Error::Validation { errors } => Self::Validation { errors },
            Error::InvalidAllocation { .. } => Self::Validation {
                errors: vec![FieldError::new("allocation", value.to_string())],
            },
            Error::InvalidProbability { .. } => Self::Validation {
                errors: vec![FieldError::new("probability", value.to_string())],
            },
            Error::InvalidDateRange { .. } => Self::Validation {
                errors: vec![FieldError::new("expectedEndDate", value.to_string())],
            },
            Error::OpportunityNotFound { .. }
            | Error::RoleNotFound { .. }
            | Error::EmployeeNotFound { .. } => Self::NotFound {
                message: value.to_string(),
            },
            Error::EmployeeExists { .. } => Self::Conflict {
                message: value.to_string(),
            },
            Error::Config { .. } | Error::Database(_) | Error::Io(_) | Error::Server { .. } => {
                error!("Request failed: {value}");
                Self::internal(INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation { errors } => json!({ "error": self.to_string(), "details": errors }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
