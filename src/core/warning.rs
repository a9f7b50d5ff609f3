//! Allocation warning formatting.
//!
//! Turns aggregated totals plus the allocation about to be added into the messages shown
//! to whoever is staffing the role. Framework-agnostic; the API layer only serializes the
//! result.

use serde::Serialize;

use crate::core::allocation::AllocationEntry;

/// Full-time capacity in percent.
pub const FULL_CAPACITY: f64 = 100.0;
/// Distance from [`FULL_CAPACITY`] still reported as exactly full.
pub const CAPACITY_TOLERANCE: f64 = 1e-9;

/// Rendered warning for a set of allocation entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationWarning {
    /// Concatenated messages in entry order; empty means "no warning"
    pub message: String,
    /// True if at least one employee would exceed full capacity
    pub is_over_allocated: bool,
}

impl AllocationWarning {
    /// The warning text, or None if nothing crossed a threshold.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        if self.message.is_empty() {
            None
        } else {
            Some(&self.message)
        }
    }
}

/// Builds the warning for adding `incoming_allocation` to every entry.
///
/// Over full capacity: `"{name} will be over-allocated at {final}%. "`.
/// Exactly at full capacity: `"{name} will be at 100% allocation. "`.
/// Anything below contributes nothing.
#[must_use]
pub fn format_warning(entries: &[AllocationEntry], incoming_allocation: f64) -> AllocationWarning {
    entries
        .iter()
        .fold(AllocationWarning::default(), |mut warning, entry| {
            let final_allocation = entry.total_allocation + incoming_allocation;

            if is_at_capacity(final_allocation) {
                warning
                    .message
                    .push_str(&format!("{} will be at 100% allocation. ", entry.name));
            } else if final_allocation > FULL_CAPACITY {
                warning.message.push_str(&format!(
                    "{} will be over-allocated at {final_allocation}%. ",
                    entry.name
                ));
                warning.is_over_allocated = true;
            }

            warning
        })
}

fn is_at_capacity(allocation: f64) -> bool {
    (allocation - FULL_CAPACITY).abs() < CAPACITY_TOLERANCE
}
