//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod employee;
pub mod opportunity;
pub mod role;
pub mod role_assignment;

// Re-export specific types to avoid conflicts
pub use employee::{Column as EmployeeColumn, Entity as Employee, Model as EmployeeModel};
pub use opportunity::{
    Column as OpportunityColumn, Entity as Opportunity, Model as OpportunityModel,
};
pub use role::{Column as RoleColumn, Entity as Role, Model as RoleModel};
pub use role_assignment::{
    Column as RoleAssignmentColumn, Entity as RoleAssignment, Model as RoleAssignmentModel,
};
