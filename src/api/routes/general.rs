//! General routes - health check and permission introspection.
//! Neither touches the database.

use axum::Json;
use serde::Serialize;

use crate::{
    api::auth::CallerRole,
    core::permissions::{Permission, UserRole, permissions_for},
};

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Body of `GET /permissions`.
#[derive(Debug, Serialize)]
pub struct PermissionsResponse {
    pub role: UserRole,
    pub permissions: Vec<Permission>,
}

/// Liveness probe; needs no role.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Lists what the caller's role is allowed to do.
///
/// Frontends use this to decide which views (analytics, clients, candidates) to show.
pub async fn permissions_handler(CallerRole(role): CallerRole) -> Json<PermissionsResponse> {
    Json(PermissionsResponse {
        role,
        permissions: permissions_for(role),
    })
}
