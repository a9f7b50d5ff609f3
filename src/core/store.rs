//! Staffing store - The repository boundary the allocation checker reads through.
//!
//! Handlers never query the database for snapshots directly; they ask a [`StaffingStore`]
//! for the current opportunity and employee collections. [`SeaOrmStore`] is the production
//! implementation, and tests can swap in their own.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::{
    core::{
        employee::list_employees,
        model::{Employee, Opportunity},
        opportunity::load_opportunities,
    },
    errors::Result,
};

/// Read access to the collections the allocation checker needs.
#[async_trait]
pub trait StaffingStore: Send + Sync {
    /// Every opportunity with its roles and assigned members.
    async fn opportunities(&self) -> Result<Vec<Opportunity>>;

    /// Every employee.
    async fn employees(&self) -> Result<Vec<Employee>>;
}

/// [`StaffingStore`] backed by the SeaORM database connection.
#[derive(Clone)]
pub struct SeaOrmStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmStore {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StaffingStore for SeaOrmStore {
    async fn opportunities(&self) -> Result<Vec<Opportunity>> {
        load_opportunities(&self.db).await
    }

    async fn employees(&self) -> Result<Vec<Employee>> {
        Ok(list_employees(&self.db)
            .await?
            .into_iter()
            .map(Employee::from)
            .collect())
    }
}
