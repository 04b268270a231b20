//! `RecordingNotifier`: a test double for `Notifier`.
//!
//! Useful in unit and integration tests where real delivery is either
//! unavailable or irrelevant.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::{Notification, Notifier, NotifyError};

/// Behaviour injected into `RecordingNotifier` at construction time.
#[derive(Debug, Clone)]
pub enum MockBehaviour {
    /// Accept every notification.
    Accept,
    /// Fail with a `Retryable` error.
    FailRetryable(String),
    /// Fail with a `Fatal` error.
    FailFatal(String),
}

/// A mock notifier that records every notification it receives and returns
/// a programmer-specified result.
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    /// What the notifier will do when `deliver` is called.
    pub behaviour: MockBehaviour,
    /// All notifications seen by this notifier (in call order).
    pub calls: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Create a mock that accepts everything.
    pub fn accepting() -> Self {
        Self::with_behaviour(MockBehaviour::Accept)
    }

    /// Create a mock that always fails with a `Fatal` error.
    pub fn failing_fatal(msg: impl Into<String>) -> Self {
        Self::with_behaviour(MockBehaviour::FailFatal(msg.into()))
    }

    /// Create a mock that always fails with a `Retryable` error.
    pub fn failing_retryable(msg: impl Into<String>) -> Self {
        Self::with_behaviour(MockBehaviour::FailRetryable(msg.into()))
    }

    fn with_behaviour(behaviour: MockBehaviour) -> Self {
        Self {
            behaviour,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of delivery attempts made against this notifier.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    /// Snapshot of every notification received so far.
    pub fn received(&self) -> Vec<Notification> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(notification.clone());
        }

        match &self.behaviour {
            MockBehaviour::Accept => Ok(()),
            MockBehaviour::FailRetryable(msg) => Err(NotifyError::Retryable(msg.clone())),
            MockBehaviour::FailFatal(msg)     => Err(NotifyError::Fatal(msg.clone())),
        }
    }
}
