//! Core business logic - framework-agnostic ledger operations.
//!
//! Each submodule owns one concern: household registry, payment lifecycle,
//! change-approval workflow, expenditures, user accounts, and reporting.
//! Functions take a `DatabaseConnection` plus, for anything that mutates or
//! is privilege-gated, a [`crate::session::Session`].

/// Change-approval workflow over households, payments, and users
pub mod change;
/// Community-fund expenditures
pub mod expenditure;
/// Household registry
pub mod household;
/// Payment lifecycle and approval state machine
pub mod payment;
/// Read-side reporting projections
pub mod report;
/// User accounts and login
pub mod user;
