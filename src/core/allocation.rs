//! Allocation aggregation - Sums each employee's committed allocation over a date window.
//!
//! Given a snapshot of opportunities and employees, [`aggregate`] walks every opportunity
//! whose date range overlaps the window and adds up the allocation of each role the
//! employee is staffed on. The result is a fresh, derived view; nothing is persisted and
//! the inputs are never mutated.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{
    model::{DateRange, Employee, Opportunity},
    overlap::OpenEndedPolicy,
};

/// Name reported for employee ids that are not in the employee collection.
pub const UNKNOWN_EMPLOYEE_NAME: &str = "Unknown Employee";

/// The (opportunity, role) pair currently being edited, left out of the totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub opportunity_id: String,
    pub role_id: String,
}

impl Exclusion {
    fn matches(&self, opportunity_id: &str, role_id: &str) -> bool {
        self.opportunity_id == opportunity_id && self.role_id == role_id
    }
}

/// One role contributing to an employee's total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationDetail {
    pub opportunity_id: String,
    pub role_name: String,
    pub allocation: f64,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// Aggregated allocation for one requested employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationEntry {
    pub employee_id: String,
    pub name: String,
    /// Sum of all matching role allocations; may exceed 100
    pub total_allocation: f64,
    pub allocations: Vec<AllocationDetail>,
}

/// Computes the allocation entries for `employee_ids` within `window`.
///
/// # Arguments
/// * `employee_ids` - Employees to report on; output keeps this order (duplicates included)
/// * `window` - The date range being checked for conflicts
/// * `opportunities` - Snapshot of all opportunities with their roles
/// * `employees` - Snapshot used only to resolve display names
/// * `exclude` - Optional (opportunity, role) pair to skip
/// * `policy` - How opportunities without an end date are matched
///
/// # Returns
/// Exactly one [`AllocationEntry`] per requested id. Employees with no matching roles get a
/// zero total and no details; unknown ids are named [`UNKNOWN_EMPLOYEE_NAME`].
#[must_use]
pub fn aggregate(
    employee_ids: &[String],
    window: &DateRange,
    opportunities: &[Opportunity],
    employees: &[Employee],
    exclude: Option<&Exclusion>,
    policy: OpenEndedPolicy,
) -> Vec<AllocationEntry> {
    let names: HashMap<&str, &str> = employees
        .iter()
        .map(|e| (e.id.as_str(), e.name.as_str()))
        .collect();

    let overlapping: Vec<&Opportunity> = opportunities
        .iter()
        .filter(|o| policy.counts(&o.date_range(), window))
        .collect();

    employee_ids
        .iter()
        .map(|employee_id| {
            let allocations: Vec<AllocationDetail> = overlapping
                .iter()
                .flat_map(|opportunity| {
                    opportunity
                        .roles
                        .iter()
                        .filter(move |role| role.has_member(employee_id))
                        .filter(move |role| {
                            !exclude.is_some_and(|x| x.matches(&opportunity.id, &role.id))
                        })
                        .map(move |role| AllocationDetail {
                            opportunity_id: opportunity.id.clone(),
                            role_name: role.role_name.clone(),
                            allocation: role.allocation,
                            start_date: opportunity.expected_start_date,
                            end_date: opportunity.expected_end_date,
                        })
                })
                .collect();

            AllocationEntry {
                employee_id: employee_id.clone(),
                name: names
                    .get(employee_id.as_str())
                    .copied()
                    .unwrap_or(UNKNOWN_EMPLOYEE_NAME)
                    .to_string(),
                total_allocation: allocations.iter().fold(0.0, |total, a| total + a.allocation),
                allocations,
            }
        })
        .collect()
}
