//! Employee business logic - Creating, listing and seeding employees.

use crate::{
    config::app::EmployeeSeed,
    core::model::Employee as EmployeeView,
    entities::{Employee, employee},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

/// Input for creating an employee.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    /// Explicit id; a UUID is generated when absent
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<employee::Model> for EmployeeView {
    fn from(model: employee::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            grade: model.grade,
            email: model.email,
        }
    }
}

/// Creates an employee after checking that the name is not blank.
///
/// Whitespace is trimmed from the name and the id. A blank id is treated as absent; an id
/// that is already taken is rejected with [`Error::EmployeeExists`].
pub async fn create_employee(db: &DatabaseConnection, new: NewEmployee) -> Result<employee::Model> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(Error::invalid_field("name", "Employee name cannot be empty"));
    }

    let id = new
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string);

    if get_employee_by_id(db, &id).await?.is_some() {
        return Err(Error::EmployeeExists { id });
    }

    let employee = employee::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        grade: Set(new.grade),
        email: Set(new.email),
        created_at: Set(chrono::Utc::now()),
    };

    let result = employee.insert(db).await?;
    Ok(result)
}

/// Retrieves all employees ordered alphabetically by name.
pub async fn list_employees(db: &DatabaseConnection) -> Result<Vec<employee::Model>> {
    Employee::find()
        .order_by_asc(employee::Column::Name)
        .order_by_asc(employee::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an employee by id, returning None if it does not exist.
pub async fn get_employee_by_id(
    db: &DatabaseConnection,
    employee_id: &str,
) -> Result<Option<employee::Model>> {
    Employee::find_by_id(employee_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Inserts the configured seed employees that are not in the database yet.
///
/// Existing rows are left untouched, so re-running on every start is safe.
///
/// # Returns
/// The number of employees inserted
pub async fn seed_employees(db: &DatabaseConnection, seeds: &[EmployeeSeed]) -> Result<usize> {
    let mut inserted = 0;

    for seed in seeds {
        if get_employee_by_id(db, &seed.id).await?.is_some() {
            continue;
        }

        create_employee(
            db,
            NewEmployee {
                id: Some(seed.id.clone()),
                name: seed.name.clone(),
                grade: seed.grade.clone(),
                email: seed.email.clone(),
            },
        )
        .await?;
        inserted += 1;
    }

    if inserted > 0 {
        info!("Seeded {inserted} employee(s) from configuration");
    }

    Ok(inserted)
}
