//! Repository functions: one function per store operation.
//!
//! Every function takes a `&DataStore` and returns a `Result<T, DbError>`.
//! Each call reads or rewrites a whole collection; callers that need
//! read-modify-write atomicity across calls must serialise access themselves.

pub mod tickets;
pub mod rules;
pub mod executions;
