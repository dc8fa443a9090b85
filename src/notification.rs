//! Decode diagnostics.
//!
//! The FLIC frame decoder skips unknown chunks, keeps partial chunk writes and
//! stops early on damaged frames instead of failing. Each such decision is
//! kept as a [`Notification`] tagged with the byte offset it happened at.

use std::fmt;

/// What kind of leniency a notification records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// Chunk type with no decoder; skipped by its declared size.
    NotImplemented,
    /// Chunk payload ran out of data; partial writes kept.
    Warning,
    /// Frame decoding stopped at this point.
    Error,
}

impl NotificationType {
    fn label(self) -> &'static str {
        match self {
            Self::NotImplemented => "skipped",
            Self::Warning => "truncated",
            Self::Error => "stopped",
        }
    }
}

/// One recorded decode decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub notification_type: NotificationType,
    /// Byte offset into the source buffer.
    pub offset: usize,
    pub message: String,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {:#x}: {}",
            self.notification_type.label(),
            self.offset,
            self.message
        )
    }
}

/// Notifications gathered over one decode session, in order of occurrence.
#[derive(Debug, Clone, Default)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(
        &mut self,
        notification_type: NotificationType,
        offset: usize,
        message: impl Into<String>,
    ) {
        self.items.push(Notification {
            notification_type,
            offset,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }

    /// The notification that ended decoding, if any.
    pub fn stop_reason(&self) -> Option<&Notification> {
        self.items
            .iter()
            .rev()
            .find(|n| n.notification_type == NotificationType::Error)
    }
}
