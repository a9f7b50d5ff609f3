//! Opportunity business logic - Creating opportunities, adding roles and staffing members.
//!
//! Write operations validate their inputs before touching the database. Read operations
//! assemble the framework-agnostic [`Opportunity`] snapshot (with roles and assigned
//! members) that the allocation checker and listing functions consume.

use std::collections::HashMap;

use crate::{
    core::model::{DateRange, Opportunity, OpportunityStatus, Role, RoleStatus},
    entities::{Employee, Opportunity as OpportunityEntity, Role as RoleEntity, RoleAssignment},
    entities::{opportunity, role, role_assignment},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use uuid::Uuid;

/// Input for creating an opportunity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOpportunity {
    pub client_name: String,
    #[serde(default = "default_opportunity_status")]
    pub status: OpportunityStatus,
    pub probability: i32,
    pub expected_start_date: NaiveDate,
    #[serde(default)]
    pub expected_end_date: Option<NaiveDate>,
}

const fn default_opportunity_status() -> OpportunityStatus {
    OpportunityStatus::InProgress
}

/// Input for adding a role to an opportunity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRole {
    pub role_name: String,
    pub required_grade: String,
    pub allocation: f64,
    #[serde(default = "default_role_status")]
    pub status: RoleStatus,
}

const fn default_role_status() -> RoleStatus {
    RoleStatus::Open
}

fn validate_percentage(allocation: f64) -> Result<()> {
    if !allocation.is_finite() || !(0.0..=100.0).contains(&allocation) {
        return Err(Error::InvalidAllocation { allocation });
    }
    Ok(())
}

fn probability_from_db(probability: i32) -> Result<u8> {
    u8::try_from(probability)
        .ok()
        .filter(|p| *p <= 100)
        .ok_or(Error::InvalidProbability { probability })
}

/// Creates an opportunity with no roles.
///
/// Rejects a blank client name, a probability outside 0-100 and an end date before the
/// start date. The client name is trimmed.
pub async fn create_opportunity(
    db: &DatabaseConnection,
    new: NewOpportunity,
) -> Result<opportunity::Model> {
    let client_name = new.client_name.trim();
    if client_name.is_empty() {
        return Err(Error::invalid_field("clientName", "Client name cannot be empty"));
    }

    probability_from_db(new.probability)?;
    let range = DateRange::new(new.expected_start_date, new.expected_end_date)?;

    let opportunity = opportunity::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        client_name: Set(client_name.to_string()),
        status: Set(new.status.as_str().to_string()),
        probability: Set(new.probability),
        expected_start_date: Set(range.start),
        expected_end_date: Set(range.end),
        created_at: Set(chrono::Utc::now()),
    };

    let result = opportunity.insert(db).await?;
    Ok(result)
}

/// Adds a role to an existing opportunity.
///
/// The allocation must be a finite percentage between 0 and 100.
pub async fn add_role(
    db: &DatabaseConnection,
    opportunity_id: &str,
    new: NewRole,
) -> Result<role::Model> {
    let role_name = new.role_name.trim();
    if role_name.is_empty() {
        return Err(Error::invalid_field("roleName", "Role name cannot be empty"));
    }
    validate_percentage(new.allocation)?;

    OpportunityEntity::find_by_id(opportunity_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| Error::OpportunityNotFound {
            id: opportunity_id.to_string(),
        })?;

    let role = role::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        opportunity_id: Set(opportunity_id.to_string()),
        role_name: Set(role_name.to_string()),
        required_grade: Set(new.required_grade.trim().to_string()),
        allocation: Set(new.allocation),
        status: Set(new.status.as_str().to_string()),
        created_at: Set(chrono::Utc::now()),
    };

    let result = role.insert(db).await?;
    Ok(result)
}

/// Finds a role, making sure it belongs to the given opportunity.
async fn find_role<C>(db: &C, opportunity_id: &str, role_id: &str) -> Result<role::Model>
where
    C: ConnectionTrait,
{
    RoleEntity::find_by_id(role_id.to_string())
        .filter(role::Column::OpportunityId.eq(opportunity_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::RoleNotFound {
            id: role_id.to_string(),
        })
}

/// Staffs an employee on a role.
///
/// Assigning a member who is already on the role is a no-op. Runs in a database
/// transaction so the existence checks and the insert see the same state.
///
/// # Returns
/// The role with its updated member list
pub async fn assign_member(
    db: &DatabaseConnection,
    opportunity_id: &str,
    role_id: &str,
    employee_id: &str,
) -> Result<Role> {
    let txn = db.begin().await?;

    let role = find_role(&txn, opportunity_id, role_id).await?;

    Employee::find_by_id(employee_id.to_string())
        .one(&txn)
        .await?
        .ok_or_else(|| Error::EmployeeNotFound {
            id: employee_id.to_string(),
        })?;

    let existing = RoleAssignment::find()
        .filter(role_assignment::Column::RoleId.eq(role_id))
        .filter(role_assignment::Column::EmployeeId.eq(employee_id))
        .one(&txn)
        .await?;

    if existing.is_none() {
        role_assignment::ActiveModel {
            role_id: Set(role_id.to_string()),
            employee_id: Set(employee_id.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    let members = member_ids(&txn, role_id).await?;
    txn.commit().await?;

    role_from_model(role, members)
}

/// Removes an employee from a role.
///
/// # Returns
/// `true` if the employee was assigned and has been removed, `false` if they were not on
/// the role
pub async fn unassign_member(
    db: &DatabaseConnection,
    opportunity_id: &str,
    role_id: &str,
    employee_id: &str,
) -> Result<bool> {
    find_role(db, opportunity_id, role_id).await?;

    let result = RoleAssignment::delete_many()
        .filter(role_assignment::Column::RoleId.eq(role_id))
        .filter(role_assignment::Column::EmployeeId.eq(employee_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

async fn member_ids<C>(db: &C, role_id: &str) -> Result<Vec<String>>
where
    C: ConnectionTrait,
{
    Ok(RoleAssignment::find()
        .filter(role_assignment::Column::RoleId.eq(role_id))
        .order_by_asc(role_assignment::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|a| a.employee_id)
        .collect())
}

/// Converts a stored role and its member ids into the domain snapshot.
pub fn role_from_model(model: role::Model, assigned_member_ids: Vec<String>) -> Result<Role> {
    Ok(Role {
        status: model.status.parse()?,
        id: model.id,
        role_name: model.role_name,
        required_grade: model.required_grade,
        allocation: model.allocation,
        assigned_member_ids,
    })
}

/// Joins opportunity, role and assignment rows into domain snapshots.
///
/// Opportunity order and role order are taken from the input slices.
fn assemble(
    opportunities: Vec<opportunity::Model>,
    roles: Vec<role::Model>,
    assignments: Vec<role_assignment::Model>,
) -> Result<Vec<Opportunity>> {
    let mut members: HashMap<String, Vec<String>> = HashMap::new();
    for assignment in assignments {
        members
            .entry(assignment.role_id)
            .or_default()
            .push(assignment.employee_id);
    }

    let mut roles_by_opportunity: HashMap<String, Vec<Role>> = HashMap::new();
    for model in roles {
        let opportunity_id = model.opportunity_id.clone();
        let assigned = members.remove(&model.id).unwrap_or_default();
        roles_by_opportunity
            .entry(opportunity_id)
            .or_default()
            .push(role_from_model(model, assigned)?);
    }

    opportunities
        .into_iter()
        .map(|model| {
            Ok(Opportunity {
                status: model.status.parse()?,
                probability: probability_from_db(model.probability)?,
                roles: roles_by_opportunity.remove(&model.id).unwrap_or_default(),
                id: model.id,
                client_name: model.client_name,
                expected_start_date: model.expected_start_date,
                expected_end_date: model.expected_end_date,
            })
        })
        .collect()
}

/// Loads every opportunity with its roles and assigned members.
///
/// Opportunities are ordered by expected start date, roles by creation time and members
/// by assignment order.
pub async fn load_opportunities(db: &DatabaseConnection) -> Result<Vec<Opportunity>> {
    let opportunities = OpportunityEntity::find()
        .order_by_asc(opportunity::Column::ExpectedStartDate)
        .order_by_asc(opportunity::Column::Id)
        .all(db)
        .await?;
    let roles = RoleEntity::find()
        .order_by_asc(role::Column::CreatedAt)
        .order_by_asc(role::Column::Id)
        .all(db)
        .await?;
    let assignments = RoleAssignment::find()
        .order_by_asc(role_assignment::Column::Id)
        .all(db)
        .await?;

    assemble(opportunities, roles, assignments)
}

/// Loads a single opportunity with its roles, or None if it does not exist.
pub async fn get_opportunity(
    db: &DatabaseConnection,
    opportunity_id: &str,
) -> Result<Option<Opportunity>> {
    let Some(model) = OpportunityEntity::find_by_id(opportunity_id.to_string())
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let roles = RoleEntity::find()
        .filter(role::Column::OpportunityId.eq(opportunity_id))
        .order_by_asc(role::Column::CreatedAt)
        .order_by_asc(role::Column::Id)
        .all(db)
        .await?;
    let role_ids: Vec<String> = roles.iter().map(|r| r.id.clone()).collect();
    let assignments = RoleAssignment::find()
        .filter(role_assignment::Column::RoleId.is_in(role_ids))
        .order_by_asc(role_assignment::Column::Id)
        .all(db)
        .await?;

    Ok(assemble(vec![model], roles, assignments)?.pop())
}
