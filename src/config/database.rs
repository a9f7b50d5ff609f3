//! Database configuration module.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::entities::{Employee, Opportunity, Role, RoleAssignment, role_assignment};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, sea_query::Index};
use tracing::debug;

/// Database used when `DATABASE_URL` is not set; `mode=rwc` creates the file on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/staffing.sqlite?mode=rwc";

/// Unique index on `(role_id, employee_id)` in `role_assignments`.
pub const UNIQUE_ASSIGNMENT_INDEX: &str = "idx_role_assignments_role_employee";

/// Gets the database URL from the `DATABASE_URL` environment variable or returns the
/// default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {database_url}");

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables that do not exist yet.
///
/// Tables are created parents first (employees, opportunities, roles, then role
/// assignments) so foreign keys always point at an existing table. A role assignment is
/// unique per role and employee.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut tables = [
        schema.create_table_from_entity(Employee),
        schema.create_table_from_entity(Opportunity),
        schema.create_table_from_entity(Role),
        schema.create_table_from_entity(RoleAssignment),
    ];

    for table in &mut tables {
        table.if_not_exists();
        db.execute(builder.build(&*table)).await?;
    }

    let unique_assignment = Index::create()
        .name(UNIQUE_ASSIGNMENT_INDEX)
        .table(RoleAssignment)
        .col(role_assignment::Column::RoleId)
        .col(role_assignment::Column::EmployeeId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&unique_assignment)).await?;

    Ok(())
}
