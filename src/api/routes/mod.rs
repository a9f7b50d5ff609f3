//! HTTP route handlers organized by resource.

/// Allocation conflict checks
pub mod allocations;

/// Employee listing and creation
pub mod employees;

/// Health and permission introspection
pub mod general;

/// Opportunity listing, creation and staffing
pub mod opportunities;

pub use allocations::*;
pub use employees::*;
pub use general::*;
pub use opportunities::*;

use axum::extract::rejection::{JsonRejection, QueryRejection};

use crate::{api::error::ApiError, errors::FieldError};

/// Turns an unparseable JSON body into a 400 with the parser's reason.
pub(crate) fn body_rejected(rejection: JsonRejection) -> ApiError {
    ApiError::Validation {
        errors: vec![FieldError::new("body", rejection.body_text())],
    }
}

/// Turns an unparseable query string into a 400 with the parser's reason.
pub(crate) fn query_rejected(rejection: QueryRejection) -> ApiError {
    ApiError::Validation {
        errors: vec![FieldError::new("query", rejection.body_text())],
    }
}
