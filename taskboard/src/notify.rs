//! User-visible notifications.
//!
//! The board reports outcomes through a [`Notifier`]: fire-and-forget
//! `success` / `error` calls. [`TracingNotifier`] only logs;
//! [`NotificationLog`] also keeps the most recent entries for display.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use parking_lot::Mutex;

use crate::api::ApiError;

/// Sink for user-facing messages.
pub trait Notifier: Send + Sync + 'static {
    /// Reports a successful operation.
    fn success(&self, message: &str);
    /// Reports a failed operation.
    fn error(&self, message: &str);
}

/// Sends one error notification per message carried by `err`.
pub fn notify_api_error<N: Notifier + ?Sized>(notifier: &N, err: &ApiError) {
    for message in err.messages() {
        notifier.error(&message);
    }
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
}

/// A recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Message text.
    pub message: String,
    /// When it was raised.
    pub at: DateTime<Local>,
}

/// Notifier that writes to the tracing log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(text = message, "notification");
    }

    fn error(&self, message: &str) {
        tracing::warn!(text = message, "error notification");
    }
}

/// Default number of entries kept by [`NotificationLog`].
pub const DEFAULT_NOTIFICATION_LIMIT: usize = 50;

/// Notifier that logs and keeps the latest notifications in memory.
#[derive(Debug)]
pub struct NotificationLog {
    entries: Mutex<VecDeque<Notification>>,
    limit: usize,
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::with_limit(DEFAULT_NOTIFICATION_LIMIT)
    }
}

impl NotificationLog {
    /// Creates a log keeping at most `limit` entries (minimum 1).
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            limit: limit.max(1),
        }
    }

    fn push(&self, level: NotificationLevel, message: &str) {
        let mut entries = self.entries.lock();
        if entries.len() == self.limit {
            entries.pop_front();
        }
        entries.push_back(Notification {
            level,
            message: message.to_string(),
            at: Local::now(),
        });
    }

    /// Snapshot of the kept entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<Notification> {
        self.entries.lock().iter().cloned().collect()
    }

    /// The `n` most recent entries, oldest first.
    #[must_use]
    pub fn latest(&self, n: usize) -> Vec<Notification> {
        let entries = self.entries.lock();
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    /// Messages of the given level, oldest first.
    #[must_use]
    pub fn messages(&self, level: NotificationLevel) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }

    /// Number of kept entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Notifier for NotificationLog {
    fn success(&self, message: &str) {
        TracingNotifier.success(message);
        self.push(NotificationLevel::Success, message);
    }

    fn error(&self, message: &str) {
        TracingNotifier.error(message);
        self.push(NotificationLevel::Error, message);
    }
}
