//! Caller role extraction and permission checks.
//!
//! Authentication happens upstream; the identity provider forwards the caller's role in
//! the `x-user-role` header and this module only enforces the permission table.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    api::error::ApiError,
    core::permissions::{Permission, UserRole, has_permission},
};

/// Header carrying the caller's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Role of the caller, extracted from [`USER_ROLE_HEADER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerRole(pub UserRole);

impl CallerRole {
    /// Rejects the request with 403 unless the caller holds `permission`.
    pub fn require(self, permission: Permission) -> Result<(), ApiError> {
        if has_permission(self.0, permission) {
            Ok(())
        } else {
            Err(ApiError::Forbidden {
                role: self.0,
                permission,
            })
        }
    }
}

impl<S> FromRequestParts<S> for CallerRole
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<UserRole>().ok())
            .map(Self)
            .ok_or(ApiError::Unauthorized)
    }
}
