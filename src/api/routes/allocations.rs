//! Allocation check route.
//!
//! `POST /allocations/check` validates the request, reads the opportunity and employee
//! snapshots from the store, and runs the aggregator. Validation failures are 400s with
//! field detail; a store failure is a 500 and is not retried.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{
    api::{AppState, auth::CallerRole, error::ApiError, routes::body_rejected},
    core::{
        allocation::{AllocationEntry, Exclusion, aggregate},
        model::DateRange,
        permissions::Permission,
        warning::{AllocationWarning, format_warning},
    },
    errors::FieldError,
};

/// Public message for any failure to read the snapshots.
pub const ALLOCATION_CHECK_FAILED: &str = "Failed to check allocations";

/// Raw request body. Every field is optional here so that missing fields surface as
/// field-level validation errors rather than a generic parse failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAllocationsRequest {
    pub employee_ids: Option<Vec<String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current_opportunity_id: Option<String>,
    pub current_role_id: Option<String>,
    /// Allocation about to be added; when present the response carries a warning
    pub incoming_allocation: Option<f64>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationCheck {
    pub employee_ids: Vec<String>,
    pub window: DateRange,
    pub exclude: Option<Exclusion>,
    pub incoming_allocation: Option<f64>,
}

/// Response body of `POST /allocations/check`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAllocationsResponse {
    pub allocations: Vec<AllocationEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<AllocationWarning>,
}

fn parse_date(field: &str, value: &str, errors: &mut Vec<FieldError>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| {
            errors.push(FieldError::new(
                field,
                format!("'{value}' is not a valid YYYY-MM-DD date"),
            ));
        })
        .ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CheckAllocationsRequest {
    /// Checks every field and collects all problems at once.
    ///
    /// The exclusion only applies when both `currentOpportunityId` and `currentRoleId` are
    /// present.
    pub fn validate(self) -> Result<AllocationCheck, ApiError> {
        let mut errors = Vec::new();

        let employee_ids = match self.employee_ids {
            None => {
                errors.push(FieldError::new("employeeIds", "employeeIds is required"));
                Vec::new()
            }
            Some(ids) if ids.is_empty() => {
                errors.push(FieldError::new("employeeIds", "at least one employee id is required"));
                Vec::new()
            }
            Some(ids) => {
                if ids.iter().any(|id| id.trim().is_empty()) {
                    errors.push(FieldError::new("employeeIds", "employee ids cannot be blank"));
                }
                ids.into_iter().map(|id| id.trim().to_string()).collect()
            }
        };

        let start = match self.start_date.as_deref() {
            None => {
                errors.push(FieldError::new("startDate", "startDate is required"));
                None
            }
            Some(value) => parse_date("startDate", value, &mut errors),
        };

        let end = self
            .end_date
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .and_then(|value| parse_date("endDate", value, &mut errors));

        if matches!((start, end), (Some(start), Some(end)) if end < start) {
            errors.push(FieldError::new("endDate", "endDate cannot be before startDate"));
        }

        if self.incoming_allocation.is_some_and(|a| !a.is_finite()) {
            errors.push(FieldError::new("incomingAllocation", "must be a finite number"));
        }

        let Some(start) = start.filter(|_| errors.is_empty()) else {
            return Err(ApiError::Validation { errors });
        };

        let exclude = match (
            non_blank(self.current_opportunity_id),
            non_blank(self.current_role_id),
        ) {
            (Some(opportunity_id), Some(role_id)) => Some(Exclusion {
                opportunity_id,
                role_id,
            }),
            _ => None,
        };

        Ok(AllocationCheck {
            employee_ids,
            window: DateRange { start, end },
            exclude,
            incoming_allocation: self.incoming_allocation,
        })
    }
}

/// Computes each requested employee's allocation over the window.
pub async fn check_allocations_handler(
    State(state): State<AppState>,
    caller: CallerRole,
    payload: Result<Json<CheckAllocationsRequest>, JsonRejection>,
) -> Result<Json<CheckAllocationsResponse>, ApiError> {
    caller.require(Permission::CheckAllocations)?;
    let Json(request) = payload.map_err(body_rejected)?;
    let check = request.validate()?;

    let (opportunities, employees) =
        tokio::try_join!(state.store.opportunities(), state.store.employees()).map_err(|e| {
            error!("Failed to load staffing snapshots: {e}");
            ApiError::internal(ALLOCATION_CHECK_FAILED)
        })?;

    debug!(
        employees = check.employee_ids.len(),
        opportunities = opportunities.len(),
        "Checking allocations"
    );

    let allocations = aggregate(
        &check.employee_ids,
        &check.window,
        &opportunities,
        &employees,
        check.exclude.as_ref(),
        state.config.allocation.open_ended_policy,
    );
    let warning = check
        .incoming_allocation
        .map(|incoming| format_warning(&allocations, incoming));

    Ok(Json(CheckAllocationsResponse {
        allocations,
        warning,
    }))
}
