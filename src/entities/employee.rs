//! Employee entity - People who can be staffed onto roles.
//!
//! The allocation checker only uses the id and name; grade and email are carried
//! for the employee listing.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Unique identifier (UUID string unless supplied by seed data)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name used in allocation warnings
    pub name: String,
    /// Seniority grade, e.g. "Senior" or "Associate"
    pub grade: Option<String>,
    pub email: Option<String>,
    /// When the employee record was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Employee and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One employee can hold many role assignments
    #[sea_orm(has_many = "super::role_assignment::Entity")]
    RoleAssignments,
}

impl Related<super::role_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoleAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
