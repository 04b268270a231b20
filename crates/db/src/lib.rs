//! `db` crate: pure persistence layer.
//!
//! Keeps tickets, rules and executions as three independently serialised
//! JSON collections in a data directory, and provides repository functions
//! for each. No business logic lives here.

pub mod error;
pub mod store;
pub mod repository;

pub use store::{Collection, DataStore};
pub use error::DbError;
