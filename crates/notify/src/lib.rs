//! `notify` crate: the `Notifier` trait and built-in notifier implementations.
//!
//! The rule engine only *records* that a `send_notification` action ran and
//! hands back a [`Notification`]. Delivering it is the job of whatever
//! [`Notifier`] the caller wires in.

pub mod error;
pub mod traits;
pub mod logging;
pub mod mock;

pub use error::NotifyError;
pub use logging::TracingNotifier;
pub use traits::{Notification, Notifier};
