//! Opportunity listing - Filtering and pagination over an opportunity snapshot.

use serde::{Deserialize, Serialize};

use crate::core::model::{Opportunity, OpportunityStatus};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Upper bound on the page size a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Criteria for narrowing an opportunity list. All set criteria must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpportunityFilter {
    pub status: Option<OpportunityStatus>,
    /// Case-insensitive substring of the client name
    pub client: Option<String>,
    pub min_probability: Option<u8>,
    /// Keep only opportunities past the auto-activation threshold
    pub active_only: bool,
}

impl OpportunityFilter {
    /// Whether `opportunity` satisfies every criterion that is set.
    #[must_use]
    pub fn matches(&self, opportunity: &Opportunity) -> bool {
        if self.status.is_some_and(|status| status != opportunity.status) {
            return false;
        }

        let client = self.client.as_deref().map(str::trim).unwrap_or_default();
        if !client.is_empty()
            && !opportunity
                .client_name
                .to_lowercase()
                .contains(&client.to_lowercase())
        {
            return false;
        }

        if self
            .min_probability
            .is_some_and(|min| opportunity.probability < min)
        {
            return false;
        }

        !self.active_only || opportunity.is_active()
    }
}

/// Requested page, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Builds a pagination request, normalizing missing or out-of-range values.
    ///
    /// Page 0 is treated as page 1 and the size is clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn new(page: Option<usize>, page_size: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }
}

/// One page of results plus the totals needed to render a pager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Returns the opportunities matching `filter`, preserving input order.
#[must_use]
pub fn filter_opportunities<'a>(
    opportunities: &'a [Opportunity],
    filter: &OpportunityFilter,
) -> Vec<&'a Opportunity> {
    opportunities.iter().filter(|o| filter.matches(o)).collect()
}

/// Slices `items` into the requested page.
///
/// A page past the end yields no items but still reports the correct totals.
#[must_use]
pub fn paginate<T>(items: Vec<T>, pagination: Pagination) -> Page<T> {
    let pagination = Pagination::new(Some(pagination.page), Some(pagination.page_size));
    let total_items = items.len();
    let total_pages = total_items.div_ceil(pagination.page_size);
    let offset = (pagination.page - 1).saturating_mul(pagination.page_size);

    Page {
        items: items
            .into_iter()
            .skip(offset)
            .take(pagination.page_size)
            .collect(),
        page: pagination.page,
        page_size: pagination.page_size,
        total_items,
        total_pages,
    }
}
