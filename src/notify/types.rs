use std::collections::BTreeMap;

use async_trait::async_trait;

use super::error::NotifyError;
use crate::pulse::DeviceKind;
use crate::volume::DisplayVolume;

/// Hint carrying the numeric percentage, rendered as a slider by some servers.
pub const VALUE_HINT: &str = "value";

/// `expire_timeout` value that leaves the expiry up to the notification server.
pub const EXPIRE_SERVER_DEFAULT: i32 = -1;

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub app_name: String,
    pub summary: String,
    pub body: String,
    /// Milliseconds, as passed to `org.freedesktop.Notifications.Notify`.
    pub expire_timeout: i32,
    pub hints: BTreeMap<String, i32>,
}

/// A reading the classifier decided the user should hear about.
#[derive(Clone, Debug, PartialEq)]
pub struct NotificationRequest {
    pub kind: DeviceKind,
    pub label: String,
    pub volume: DisplayVolume,
    /// Rounded display percentage; `0` when muted.
    pub percent: u32,
}

impl NotificationRequest {
    pub fn new(kind: DeviceKind, label: String, volume: DisplayVolume, percent: u32) -> Self {
        let percent = if volume.is_muted() { 0 } else { percent };
        Self { kind, label, volume, percent }
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }
}

#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Sends one notification and returns the server-assigned id.
    async fn send(&self, notification: &Notification) -> Result<u32, NotifyError>;

    async fn close(&self) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_muted_percent_is_zero() {
        let request = NotificationRequest::new(
            DeviceKind::Sink,
            "Speakers".to_string(),
            DisplayVolume::Muted,
            57,
        );
        assert!(request.is_muted());
        assert_eq!(request.percent, 0);
    }

    #[test]
    fn test_request_keeps_percent() {
        let request = NotificationRequest::new(
            DeviceKind::Source,
            "Microphone".to_string(),
            DisplayVolume::Level(42.0),
            42,
        );
        assert!(!request.is_muted());
        assert_eq!(request.percent, 42);
    }
}
