//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        employee::{self, NewEmployee},
        model::{OpportunityStatus, RoleStatus},
        opportunity::{self, NewOpportunity, NewRole},
    },
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Parses a `YYYY-MM-DD` literal.
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Creates a test employee with a generated id and no grade or email.
pub async fn create_test_employee(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::employee::Model> {
    employee::create_employee(
        db,
        NewEmployee {
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
}

/// Builds opportunity input with sensible defaults.
///
/// # Defaults
/// * `client_name`: "Test Client"
/// * `status`: In Progress
/// * `probability`: 90
pub fn new_opportunity(start: &str, end: Option<&str>) -> NewOpportunity {
    NewOpportunity {
        client_name: "Test Client".to_string(),
        status: OpportunityStatus::InProgress,
        probability: 90,
        expected_start_date: date(start),
        expected_end_date: end.map(date),
    }
}

/// Creates a test opportunity spanning `start..=end` (open-ended if `end` is None).
pub async fn create_test_opportunity(
    db: &DatabaseConnection,
    start: &str,
    end: Option<&str>,
) -> Result<entities::opportunity::Model> {
    opportunity::create_opportunity(db, new_opportunity(start, end)).await
}

/// Builds role input with grade "Senior" and status Open.
pub fn new_role(name: &str, allocation: f64) -> NewRole {
    NewRole {
        role_name: name.to_string(),
        required_grade: "Senior".to_string(),
        allocation,
        status: RoleStatus::Open,
    }
}

/// Sets up a database holding one employee staffed on one role.
/// The opportunity runs through the first half of 2024.
/// Returns (db, opportunity, role, employee).
pub async fn setup_with_staffed_role(
    allocation: f64,
) -> Result<(
    DatabaseConnection,
    entities::opportunity::Model,
    entities::role::Model,
    entities::employee::Model,
)> {
    let db = setup_test_db().await?;
    let employee = create_test_employee(&db, "Test Employee").await?;
    let opportunity = create_test_opportunity(&db, "2024-01-01", Some("2024-06-30")).await?;
    let role = opportunity::add_role(&db, &opportunity.id, new_role("Developer", allocation)).await?;
    opportunity::assign_member(&db, &opportunity.id, &role.id, &employee.id).await?;
    Ok((db, opportunity, role, employee))
}
