//! Date-range overlap predicate used by the allocation checker.
//!
//! Two ranges overlap when each one starts on or before the other one's effective end,
//! where an open-ended range ends at +∞. [`OpenEndedPolicy`] decides whether an
//! opportunity without an end date is matched by that rule or counted against every
//! window; the default counts it so that a conflict is never missed.

use serde::{Deserialize, Serialize};

use crate::core::model::DateRange;

/// How an opportunity without an end date is matched against the checked window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenEndedPolicy {
    /// An open-ended opportunity counts against every window.
    #[default]
    AlwaysOverlap,
    /// An open-ended opportunity runs from its start to +∞ and is compared like any other.
    FromStart,
}

impl OpenEndedPolicy {
    /// Whether an opportunity spanning `opportunity` counts against `window`.
    ///
    /// Only the opportunity side is short-circuited; an open window still skips closed
    /// opportunities that ended before it starts.
    #[must_use]
    pub fn counts(self, opportunity: &DateRange, window: &DateRange) -> bool {
        match self {
            Self::AlwaysOverlap if opportunity.is_open_ended() => true,
            _ => overlaps(opportunity, window),
        }
    }
}

/// Returns true if `a` and `b` share at least one day.
///
/// Symmetric in `a` and `b`. Ends are inclusive and a missing end is +∞.
#[must_use]
pub fn overlaps(a: &DateRange, b: &DateRange) -> bool {
    starts_before_end_of(a, b) && starts_before_end_of(b, a)
}

fn starts_before_end_of(x: &DateRange, y: &DateRange) -> bool {
    y.end.is_none_or(|end| x.start <= end)
}
