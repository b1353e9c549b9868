//! Transient notifications raised by every workflow, with read tracking.

mod router;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub use router::notification_router;

/// `Error` is rendered destructively by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl NotificationDraft {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
            action_url: None,
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, title, message)
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title, message)
    }

    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

/// Outbound hook every workflow reports through.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, draft: NotificationDraft) -> Result<Notification, NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification center unavailable: {0}")]
    Unavailable(String),
    #[error("notification {0} not found")]
    NotFound(u64),
}

/// Entries kept before the oldest are dropped.
pub const DEFAULT_FEED_CAPACITY: usize = 100;

/// In-memory notification list, newest first, bounded to `capacity` entries.
#[derive(Debug)]
pub struct NotificationCenter {
    sequence: AtomicU64,
    capacity: usize,
    entries: Mutex<VecDeque<Notification>>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_FEED_CAPACITY)
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of zero is raised to one so the latest notification is always visible.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sequence: AtomicU64::new(0),
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Feed pre-filled with the welcome notifications a fresh account sees.
    pub fn seeded() -> Self {
        let center = Self::new();
        let now = Utc::now();
        let starters = [
            (
                NotificationDraft::success(
                    "Interview Scheduled",
                    "Interview scheduled for Marketing Associate position",
                ),
                Duration::hours(24),
                true,
            ),
            (
                NotificationDraft::success(
                    "New Job Match",
                    "5 new jobs match your profile preferences",
                )
                .with_action_url("/jobs"),
                Duration::hours(4),
                false,
            ),
            (
                NotificationDraft::info(
                    "Application Update",
                    "Your application for Software Engineer Intern has been reviewed",
                )
                .with_action_url("/dashboard/student"),
                Duration::hours(2),
                false,
            ),
        ];
        if let Ok(mut entries) = center.entries.lock() {
            for (draft, age, read) in starters {
                let mut notification = center.stamp(draft, now - age);
                notification.read = read;
                entries.push_front(notification);
            }
        }
        center
    }

    fn stamp(&self, draft: NotificationDraft, timestamp: DateTime<Utc>) -> Notification {
        Notification {
            id: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
            title: draft.title,
            message: draft.message,
            kind: draft.kind,
            timestamp,
            read: false,
            action_url: draft.action_url,
        }
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, VecDeque<Notification>>, NotifyError> {
        self.entries
            .lock()
            .map_err(|_| NotifyError::Unavailable("notification mutex poisoned".to_string()))
    }

    pub fn list(&self) -> Result<Vec<Notification>, NotifyError> {
        Ok(self.entries()?.iter().cloned().collect())
    }

    pub fn latest(&self) -> Result<Option<Notification>, NotifyError> {
        Ok(self.entries()?.front().cloned())
    }

    pub fn mark_as_read(&self, id: u64) -> Result<Notification, NotifyError> {
        let mut entries = self.entries()?;
        let entry = entries
            .iter_mut()
            .find(|notification| notification.id == id)
            .ok_or(NotifyError::NotFound(id))?;
        entry.read = true;
        Ok(entry.clone())
    }

    pub fn mark_all_as_read(&self) -> Result<usize, NotifyError> {
        let mut entries = self.entries()?;
        let mut changed = 0;
        for entry in entries.iter_mut().filter(|entry| !entry.read) {
            entry.read = true;
            changed += 1;
        }
        Ok(changed)
    }

    pub fn unread_count(&self) -> Result<usize, NotifyError> {
        Ok(self.entries()?.iter().filter(|entry| !entry.read).count())
    }
}

impl NotificationPublisher for NotificationCenter {
    fn publish(&self, draft: NotificationDraft) -> Result<Notification, NotifyError> {
        let notification = self.stamp(draft, Utc::now());

        tracing::debug!(
            id = notification.id,
            kind = ?notification.kind,
            title = %notification.title,
            "notification published"
        );

        let mut entries = self.entries()?;
        entries.push_front(notification.clone());
        entries.truncate(self.capacity);
        Ok(notification)
    }
}
