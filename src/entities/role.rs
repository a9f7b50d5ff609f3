//! Role entity - A staffing position within an opportunity.
//!
//! Each role carries a required grade and an allocation percentage of one
//! full-time employee. Members are linked through `role_assignments`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    /// Unique identifier for the role
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// ID of the opportunity this role belongs to
    pub opportunity_id: String,
    /// Human-readable role name (e.g., "Tech Lead")
    pub role_name: String,
    /// Grade an assignee is expected to hold
    pub required_grade: String,
    /// Percentage of one full-time employee (0-100)
    pub allocation: f64,
    /// Staffing status: `"Open"`, `"Staffed"`, `"Won"` or `"Lost"`
    pub status: String,
    /// When the role was created; roles are listed in creation order
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Role and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each role belongs to one opportunity
    #[sea_orm(
        belongs_to = "super::opportunity::Entity",
        from = "Column::OpportunityId",
        to = "super::opportunity::Column::Id"
    )]
    Opportunity,
    /// One role has many member assignments
    #[sea_orm(has_many = "super::role_assignment::Entity")]
    RoleAssignments,
}

impl Related<super::opportunity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Opportunity.def()
    }
}

impl Related<super::role_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoleAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
