use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub created_at: Instant,
    pub timeout: Duration,
}

impl Notification {
    pub fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            message: message.into(),
            level,
            created_at: Instant::now(),
            timeout: Duration::from_secs(3),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Info)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Error)
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.timeout
    }
}

/// One transient message at a time; newer messages replace older ones.
/// Everything runs on the UI thread, so plain ownership is enough.
#[derive(Debug, Default)]
pub struct NotificationManager {
    current: Option<Notification>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, notification: Notification) {
        self.current = Some(notification);
    }

    pub fn show_info(&mut self, message: impl Into<String>) {
        self.show(Notification::info(message));
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.show(Notification::error(message));
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Drop an expired message. Returns true when the display changed.
    pub fn update(&mut self) -> bool {
        if self.current.as_ref().is_some_and(|n| n.is_expired()) {
            self.current = None;
            return true;
        }
        false
    }
}
