use std::time::{Duration, Instant};

/// Default time a notification stays on screen.
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub expires_at: Instant,
}

/// Transient banners, auto-dismissed after a fixed duration.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    duration: Duration,
    next_id: u64,
    entries: Vec<Notification>,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(NOTIFICATION_DURATION)
    }
}

impl NotificationQueue {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            next_id: 1,
            entries: Vec::new(),
        }
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Notification {
            id,
            kind,
            message: message.into(),
            expires_at: now + self.duration,
        });
        id
    }

    /// Removes a notification before it expires. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.id != id);
        self.entries.len() != before
    }

    pub fn prune(&mut self, now: Instant) {
        self.entries.retain(|n| n.expires_at > now);
    }

    pub fn active(&self) -> &[Notification] {
        &self.entries
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
    fn test_expires_after_duration() {
        let start = Instant::now();
        let mut queue = NotificationQueue::new(Duration::from_secs(3));
        queue.push(NotificationKind::Error, "Refresh failed: timeout", start);

        queue.prune(start + Duration::from_millis(2999));
        assert_eq!(queue.len(), 1);

        queue.prune(start + Duration::from_secs(3));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dismiss_early() {
        let now = Instant::now();
        let mut queue = NotificationQueue::default();
        let first = queue.push(NotificationKind::Success, "one", now);
        let second = queue.push(NotificationKind::Info, "two", now);
        assert_ne!(first, second);

        assert!(queue.dismiss(first));
        assert!(!queue.dismiss(first));
        assert_eq!(queue.active().len(), 1);
        assert_eq!(queue.active()[0].message, "two");
    }

    #[test]
    fn test_keeps_arrival_order() {
        let now = Instant::now();
        let mut queue = NotificationQueue::default();
        queue.push(NotificationKind::Info, "a", now);
        queue.push(NotificationKind::Info, "b", now + Duration::from_secs(1));
        queue.prune(now + Duration::from_millis(3500));
        let messages: Vec<&str> = queue.active().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["b"]);
    }
}
