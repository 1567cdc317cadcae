//! Single-slot notification mailbox for the product list.
//!
//! At most one notification is visible at a time; posting a new one replaces
//! whatever was there, dismissed or not.

use serde::Serialize;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The operation completed.
    Success,
    /// The operation completed only in part.
    PartialFailure,
    /// The operation failed.
    Failure,
}

/// A transient message shown to the merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Message text.
    pub content: String,
    /// Presentation.
    pub kind: NotificationKind,
    /// Whether the notification is still showing.
    pub active: bool,
}

/// The mailbox itself.
#[derive(Debug, Default)]
pub struct NotificationSlot {
    current: Option<Notification>,
}

impl NotificationSlot {
    /// Replace the current notification.
    pub fn post(&mut self, content: impl Into<String>, kind: NotificationKind) {
        self.current = Some(Notification {
            content: content.into(),
            kind,
            active: true,
        });
    }

    /// Hide the current notification.
    pub fn dismiss(&mut self) {
        if let Some(notification) = &mut self.current {
            notification.active = false;
        }
    }

    /// The notification, if one is showing.
    #[must_use]
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().filter(|n| n.active)
    }
}
