//! Domain model - Framework-agnostic snapshots of opportunities, roles and employees.
//!
//! These are the shapes the allocation checker and the listing functions work on.
//! They are built from the database entities by [`crate::core::opportunity`], serialize to
//! camelCase JSON for the API, and never hold a database handle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::{Error, Result};

/// Probability (in percent) at which an opportunity counts as active.
pub const AUTO_ACTIVATION_PROBABILITY: u8 = 80;

/// Lifecycle status of an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpportunityStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "On Hold")]
    OnHold,
    Done,
}

impl OpportunityStatus {
    /// Display string, also used as the stored column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::OnHold => "On Hold",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for OpportunityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpportunityStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in progress" | "in_progress" => Ok(Self::InProgress),
            "on hold" | "on_hold" => Ok(Self::OnHold),
            "done" => Ok(Self::Done),
            _ => Err(Error::invalid_field(
                "status",
                format!("unknown opportunity status '{s}'"),
            )),
        }
    }
}

/// Staffing status of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleStatus {
    Open,
    Staffed,
    Won,
    Lost,
}

impl RoleStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Staffed => "Staffed",
            Self::Won => "Won",
            Self::Lost => "Lost",
        }
    }
}

impl fmt::Display for RoleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "staffed" => Ok(Self::Staffed),
            "won" => Ok(Self::Won),
            "lost" => Ok(Self::Lost),
            _ => Err(Error::invalid_field(
                "status",
                format!("unknown role status '{s}'"),
            )),
        }
    }
}

/// A date range with a mandatory start and an optional end.
///
/// `end == None` means the range runs indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Builds a range, rejecting an end date that falls before the start date.
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self> {
        match end {
            Some(end) if end < start => Err(Error::InvalidDateRange { start, end }),
            _ => Ok(Self { start, end }),
        }
    }

    /// A range that starts on `start` and never ends.
    #[must_use]
    pub const fn open_ended(start: NaiveDate) -> Self {
        Self { start, end: None }
    }

    #[must_use]
    pub const fn is_open_ended(&self) -> bool {
        self.end.is_none()
    }
}

/// A staffing position within an opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub role_name: String,
    pub required_grade: String,
    /// Percentage of one full-time employee (0-100)
    pub allocation: f64,
    pub status: RoleStatus,
    /// Employees staffed on this role, in assignment order
    #[serde(default)]
    pub assigned_member_ids: Vec<String>,
}

impl Role {
    /// Whether `employee_id` is staffed on this role.
    #[must_use]
    pub fn has_member(&self, employee_id: &str) -> bool {
        self.assigned_member_ids.iter().any(|id| id == employee_id)
    }
}

/// A tracked engagement with a client and the roles it needs filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    pub client_name: String,
    pub status: OpportunityStatus,
    /// Win probability in percent (0-100)
    pub probability: u8,
    pub expected_start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl Opportunity {
    /// The engagement's date range; open-ended when there is no end date.
    #[must_use]
    pub const fn date_range(&self) -> DateRange {
        DateRange {
            start: self.expected_start_date,
            end: self.expected_end_date,
        }
    }

    /// Opportunities at or above [`AUTO_ACTIVATION_PROBABILITY`] are treated as active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.probability >= AUTO_ACTIVATION_PROBABILITY
    }
}

/// A person who can be staffed onto roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_opportunity_status_parses_display_and_snake_case() {
        assert_eq!(
            "In Progress".parse::<OpportunityStatus>().unwrap(),
            OpportunityStatus::InProgress
        );
        assert_eq!(
            "on_hold".parse::<OpportunityStatus>().unwrap(),
            OpportunityStatus::OnHold
        );
        assert_eq!("DONE".parse::<OpportunityStatus>().unwrap(), OpportunityStatus::Done);
        assert!("closed".parse::<OpportunityStatus>().is_err());
    }

    #[test]
    fn test_role_status_round_trips_through_display() {
        for status in [RoleStatus::Open, RoleStatus::Staffed, RoleStatus::Won, RoleStatus::Lost] {
            assert_eq!(status.to_string().parse::<RoleStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_date_range_rejects_end_before_start() {
        let result = DateRange::new(date("2024-02-01"), Some(date("2024-01-31")));
        assert!(matches!(result, Err(Error::InvalidDateRange { .. })));

        let single_day = DateRange::new(date("2024-02-01"), Some(date("2024-02-01"))).unwrap();
        assert!(!single_day.is_open_ended());
    }

    #[test]
    fn test_auto_activation_threshold() {
        let mut opportunity = Opportunity {
            id: "o1".to_string(),
            client_name: "Acme".to_string(),
            status: OpportunityStatus::InProgress,
            probability: 79,
            expected_start_date: date("2024-01-01"),
            expected_end_date: None,
            roles: vec![],
        };
        assert!(!opportunity.is_active());

        opportunity.probability = 80;
        assert!(opportunity.is_active());
        assert!(opportunity.date_range().is_open_ended());
    }

    #[test]
    fn test_opportunity_serializes_camel_case() {
        let opportunity = Opportunity {
            id: "o1".to_string(),
            client_name: "Acme".to_string(),
            status: OpportunityStatus::OnHold,
            probability: 50,
            expected_start_date: date("2024-01-01"),
            expected_end_date: Some(date("2024-06-30")),
            roles: vec![],
        };

        let json = serde_json::to_value(&opportunity).unwrap();
        assert_eq!(json["clientName"], "Acme");
        assert_eq!(json["status"], "On Hold");
        assert_eq!(json["expectedStartDate"], "2024-01-01");
        assert_eq!(json["expectedEndDate"], "2024-06-30");
    }
}
