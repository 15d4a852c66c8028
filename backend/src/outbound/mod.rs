//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local store used for development and tests
//!
//! Adapters translate between domain types and storage representations.
//! They contain no matching logic.

pub mod memory;
pub mod persistence;
