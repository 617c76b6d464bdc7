//! Backend reachability indicator and transient user notifications.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Reachability as of the last completed fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiStatus {
    /// No fetch has completed yet
    #[default]
    Unknown,
    Online,
    Offline,
}

impl ApiStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ApiStatus::Unknown => "Connecting",
            ApiStatus::Online => "Online",
            ApiStatus::Offline => "Offline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub raised_at: Instant,
}

/// Toast queue; entries disappear once older than the configured lifetime
#[derive(Debug, Clone)]
pub struct Notifications {
    entries: VecDeque<Notification>,
    ttl: Duration,
}

/// Upper bound on queued toasts; the oldest is dropped beyond it
const MAX_NOTIFICATIONS: usize = 8;

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.push_at(level, message, Instant::now());
    }

    pub fn push_at(&mut self, level: NotificationLevel, message: impl Into<String>, now: Instant) {
        if self.entries.len() == MAX_NOTIFICATIONS {
            self.entries.pop_front();
        }
        self.entries.push_back(Notification {
            level,
            message: message.into(),
            raised_at: now,
        });
    }

    /// Drop expired entries
    pub fn expire(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|n| now.saturating_duration_since(n.raised_at) < ttl);
    }

    /// Remove one entry (the close button)
    pub fn dismiss(&mut self, index: usize) {
        self.entries.remove(index);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_expire_after_ttl() {
        let start = Instant::now();
        let mut notes = Notifications::new(Duration::from_secs(3));
        notes.push_at(NotificationLevel::Danger, "Failed to load videos", start);
        notes.push_at(
            NotificationLevel::Success,
            "Loaded video: a.mp4",
            start + Duration::from_secs(2),
        );

        notes.expire(start + Duration::from_secs(1));
        assert_eq!(notes.len(), 2);

        notes.expire(start + Duration::from_secs(3));
        assert_eq!(notes.len(), 1);
        assert_eq!(notes.iter().next().unwrap().level, NotificationLevel::Success);

        notes.expire(start + Duration::from_secs(5));
        assert!(notes.is_empty());
    }

    #[test]
    fn test_notifications_are_bounded() {
        let mut notes = Notifications::new(Duration::from_secs(3));
        for i in 0..20 {
            notes.push(NotificationLevel::Info, format!("note {}", i));
        }
        assert_eq!(notes.len(), MAX_NOTIFICATIONS);
        assert_eq!(notes.iter().next().unwrap().message, "note 12");
    }

    #[test]
    fn test_dismiss() {
        let mut notes = Notifications::new(Duration::from_secs(3));
        notes.push(NotificationLevel::Info, "a");
        notes.push(NotificationLevel::Info, "b");
        notes.dismiss(0);
        assert_eq!(notes.iter().next().unwrap().message, "b");
        notes.dismiss(5);
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ApiStatus::default(), ApiStatus::Unknown);
        assert_eq!(ApiStatus::Offline.label(), "Offline");
    }
}
