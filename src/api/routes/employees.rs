//! Employee routes.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    api::{AppState, auth::CallerRole, error::ApiError, routes::body_rejected},
    core::{
        employee::{NewEmployee, create_employee},
        model::Employee,
        permissions::Permission,
    },
};

/// Lists every employee, alphabetically.
pub async fn list_employees_handler(
    State(state): State<AppState>,
    caller: CallerRole,
) -> Result<Json<Vec<Employee>>, ApiError> {
    caller.require(Permission::ViewEmployees)?;

    Ok(Json(state.store.employees().await?))
}

/// Creates an employee and returns it with status 201.
pub async fn create_employee_handler(
    State(state): State<AppState>,
    caller: CallerRole,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    caller.require(Permission::ManageEmployees)?;
    let Json(new) = payload.map_err(body_rejected)?;

    let created = create_employee(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}
