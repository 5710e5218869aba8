//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod expenditure;
pub mod household;
pub mod payment;
pub mod pending_change;
pub mod user;

// Re-export specific types to avoid conflicts
pub use expenditure::{
    Column as ExpenditureColumn, Entity as Expenditure, Model as ExpenditureModel,
};
pub use household::{Column as HouseholdColumn, Entity as Household, Model as HouseholdModel};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use pending_change::{
    Column as PendingChangeColumn, Entity as PendingChange, Model as PendingChangeModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
