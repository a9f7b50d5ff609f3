//! Opportunity routes - listing with filters, creation, roles and staffing.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    api::{
        AppState,
        auth::CallerRole,
        error::ApiError,
        routes::{body_rejected, query_rejected},
    },
    core::{
        listing::{OpportunityFilter, Page, Pagination, filter_opportunities, paginate},
        model::{Opportunity, OpportunityStatus, Role},
        opportunity::{
            NewOpportunity, NewRole, add_role, assign_member, create_opportunity,
            get_opportunity, role_from_model, unassign_member,
        },
        permissions::Permission,
    },
    errors::Error,
};

/// Query string of `GET /opportunities`.
#[derive(Debug, Default, Deserialize)]
pub struct ListOpportunitiesQuery {
    pub status: Option<String>,
    pub client: Option<String>,
    pub min_probability: Option<u8>,
    #[serde(default)]
    pub active_only: bool,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl ListOpportunitiesQuery {
    fn into_parts(self) -> Result<(OpportunityFilter, Pagination), Error> {
        let status = self
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<OpportunityStatus>)
            .transpose()?;

        Ok((
            OpportunityFilter {
                status,
                client: self.client,
                min_probability: self.min_probability,
                active_only: self.active_only,
            },
            Pagination::new(self.page, self.page_size),
        ))
    }
}

async fn require_opportunity(state: &AppState, opportunity_id: &str) -> Result<Opportunity, ApiError> {
    get_opportunity(&state.db, opportunity_id)
        .await?
        .ok_or_else(|| {
            Error::OpportunityNotFound {
                id: opportunity_id.to_string(),
            }
            .into()
        })
}

/// Lists opportunities matching the query filters, one page at a time.
pub async fn list_opportunities_handler(
    State(state): State<AppState>,
    caller: CallerRole,
    query: Result<Query<ListOpportunitiesQuery>, QueryRejection>,
) -> Result<Json<Page<Opportunity>>, ApiError> {
    caller.require(Permission::ViewOpportunities)?;
    let Query(query) = query.map_err(query_rejected)?;
    let (filter, pagination) = query.into_parts()?;

    let opportunities = state.store.opportunities().await?;
    let matching: Vec<Opportunity> = filter_opportunities(&opportunities, &filter)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(paginate(matching, pagination)))
}

/// Fetches one opportunity with its roles.
pub async fn get_opportunity_handler(
    State(state): State<AppState>,
    caller: CallerRole,
    Path(opportunity_id): Path<String>,
) -> Result<Json<Opportunity>, ApiError> {
    caller.require(Permission::ViewOpportunities)?;

    Ok(Json(require_opportunity(&state, &opportunity_id).await?))
}

/// Creates an opportunity with no roles and returns it with status 201.
pub async fn create_opportunity_handler(
    State(state): State<AppState>,
    caller: CallerRole,
    payload: Result<Json<NewOpportunity>, JsonRejection>,
) -> Result<(StatusCode, Json<Opportunity>), ApiError> {
    caller.require(Permission::ManageOpportunities)?;
    let Json(new) = payload.map_err(body_rejected)?;

    let created = create_opportunity(&state.db, new).await?;
    let opportunity = require_opportunity(&state, &created.id).await?;
    Ok((StatusCode::CREATED, Json(opportunity)))
}

/// Adds a role to an opportunity and returns it with status 201.
pub async fn add_role_handler(
    State(state): State<AppState>,
    caller: CallerRole,
    Path(opportunity_id): Path<String>,
    payload: Result<Json<NewRole>, JsonRejection>,
) -> Result<(StatusCode, Json<Role>), ApiError> {
    caller.require(Permission::ManageOpportunities)?;
    let Json(new) = payload.map_err(body_rejected)?;

    let created = add_role(&state.db, &opportunity_id, new).await?;
    Ok((StatusCode::CREATED, Json(role_from_model(created, Vec::new())?)))
}

/// Staffs an employee on a role; assigning twice is harmless.
pub async fn assign_member_handler(
    State(state): State<AppState>,
    caller: CallerRole,
    Path((opportunity_id, role_id, employee_id)): Path<(String, String, String)>,
) -> Result<Json<Role>, ApiError> {
    caller.require(Permission::ManageOpportunities)?;

    let role = assign_member(&state.db, &opportunity_id, &role_id, &employee_id).await?;
    Ok(Json(role))
}

/// Removes an employee from a role; 404 if they were not on it.
pub async fn unassign_member_handler(
    State(state): State<AppState>,
    caller: CallerRole,
    Path((opportunity_id, role_id, employee_id)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    caller.require(Permission::ManageOpportunities)?;

    if unassign_member(&state.db, &opportunity_id, &role_id, &employee_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound {
            message: format!("Employee {employee_id} is not assigned to role {role_id}"),
        })
    }
}
