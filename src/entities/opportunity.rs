//! Opportunity entity - A tracked sales/staffing engagement with a client.
//!
//! The status is stored as its display string ("In Progress", "On Hold", "Done").
//! A missing `expected_end_date` means the engagement is open-ended.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Opportunity database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "opportunities")]
pub struct Model {
    /// Unique identifier for the opportunity
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Name of the client the opportunity is for
    pub client_name: String,
    /// Lifecycle status as its display string
    pub status: String,
    /// Win probability in percent (0-100)
    pub probability: i32,
    /// First day of the engagement
    pub expected_start_date: Date,
    /// Last day of the engagement, None if open-ended
    pub expected_end_date: Option<Date>,
    /// When the opportunity was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Opportunity and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One opportunity has many roles
    #[sea_orm(has_many = "super::role::Entity")]
    Roles,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
