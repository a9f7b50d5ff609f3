/// Per-employee allocation totals over a date window
pub mod allocation;
/// Employee creation, listing and seeding
pub mod employee;
/// Opportunity filtering and pagination
pub mod listing;
/// Framework-agnostic domain snapshots
pub mod model;
/// Opportunity, role and staffing persistence
pub mod opportunity;
/// Date-range overlap predicate
pub mod overlap;
/// Role-based access control table
pub mod permissions;
/// Repository boundary for snapshot reads
pub mod store;
/// Over-allocation and at-capacity warnings
pub mod warning;
