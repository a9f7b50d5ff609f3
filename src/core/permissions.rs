//! Role-based access control.
//!
//! A flat table maps each permission to the user roles that hold it. There is no role
//! inheritance: checking a permission is a membership test against that table.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::{Error, Result};

/// Role of the calling user, as forwarded by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    Recruiter,
    Viewer,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Recruiter => "recruiter",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "recruiter" => Ok(Self::Recruiter),
            "viewer" => Ok(Self::Viewer),
            _ => Err(Error::invalid_field("role", format!("unknown user role '{s}'"))),
        }
    }
}

/// Actions and views gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewOpportunities,
    ManageOpportunities,
    ViewEmployees,
    ManageEmployees,
    CheckAllocations,
    ViewAnalytics,
    ViewClients,
    ViewCandidates,
}

use UserRole::{Admin, Manager, Recruiter, Viewer};

/// Which roles hold each permission.
pub const PERMISSION_TABLE: &[(Permission, &[UserRole])] = &[
    (Permission::ViewOpportunities, &[Admin, Manager, Recruiter, Viewer]),
    (Permission::ManageOpportunities, &[Admin, Manager]),
    (Permission::ViewEmployees, &[Admin, Manager, Recruiter]),
    (Permission::ManageEmployees, &[Admin]),
    (Permission::CheckAllocations, &[Admin, Manager, Recruiter]),
    (Permission::ViewAnalytics, &[Admin, Manager]),
    (Permission::ViewClients, &[Admin, Manager, Viewer]),
    (Permission::ViewCandidates, &[Admin, Recruiter]),
];

/// Returns true if `role` holds `permission`.
#[must_use]
pub fn has_permission(role: UserRole, permission: Permission) -> bool {
    PERMISSION_TABLE
        .iter()
        .any(|(p, roles)| *p == permission && roles.contains(&role))
}

/// All permissions held by `role`, in table order.
#[must_use]
pub fn permissions_for(role: UserRole) -> Vec<Permission> {
    PERMISSION_TABLE
        .iter()
        .filter(|(_, roles)| roles.contains(&role))
        .map(|(permission, _)| *permission)
        .collect()
}
