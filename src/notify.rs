//! Notification scheduling contracts and expiry reminders.
//!
//! Delivery is the platform's job; this module only decides what to
//! schedule and when.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::types::PantryItem;

/// Hours before expiration at which an expiry reminder fires.
pub const REMINDER_LEAD_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification scheduling failed: {0}")]
    Scheduling(String),

    #[error("Notifications not permitted")]
    NotPermitted,
}

/// A notification to deliver at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub deliver_at: DateTime<Utc>,
}

/// Scheduling contract; on mobile this is the OS notification center.
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// Schedule a notification. Scheduling again with the same id replaces
    /// the earlier request.
    async fn schedule(&self, request: NotificationRequest) -> Result<(), NotifyError>;

    /// Cancel a scheduled notification. Cancelling an unknown id is a no-op.
    async fn cancel(&self, id: Uuid) -> Result<(), NotifyError>;
}

/// Build one reminder per pantry item that is expiring soon.
///
/// The reminder reuses the pantry item's id, so rescheduling after an edit
/// replaces the previous notification instead of stacking a duplicate. The
/// delivery time is clamped to now for items expiring within the lead time.
pub fn expiry_reminders(pantry: &[PantryItem]) -> Vec<NotificationRequest> {
    pantry
        .iter()
        .filter(|item| item.is_expiring_soon())
        .filter_map(|item| {
            let expires_at = item.expires_at?;
            let deliver_at = (expires_at - Duration::hours(REMINDER_LEAD_HOURS)).max(Utc::now());
            Some(NotificationRequest {
                id: item.id,
                title: "Use it before you lose it".to_string(),
                body: format!("{} expires soon", item.name),
                deliver_at,
            })
        })
        .collect()
}

/// Scheduler that records requests instead of delivering them.
#[derive(Debug, Default)]
pub struct MemoryScheduler {
    scheduled: RwLock<Vec<NotificationRequest>>,
}

impl MemoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of currently scheduled notifications.
    pub fn scheduled(&self) -> Vec<NotificationRequest> {
        self.scheduled.read().unwrap().clone()
    }
}

#[async_trait]
impl NotificationScheduler for MemoryScheduler {
    async fn schedule(&self, request: NotificationRequest) -> Result<(), NotifyError> {
        let mut scheduled = self.scheduled.write().unwrap();
        scheduled.retain(|r| r.id != request.id);
        scheduled.push(request);
        Ok(())
    }

    async fn cancel(&self, id: Uuid) -> Result<(), NotifyError> {
        self.scheduled.write().unwrap().retain(|r| r.id != id);
        Ok(())
    }
}
