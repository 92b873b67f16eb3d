use std::fmt;
use super::error::AudioError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Sink,
    Source,
}

impl DeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Sink => "sink",
            DeviceKind::Source => "source",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    New,
    Change,
    Remove,
}

/// Subscription event for a sink or source, as delivered by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    pub facility: DeviceKind,
    pub index: u32,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(facility: DeviceKind, index: u32, kind: ChangeKind) -> Self {
        Self { facility, index, kind }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeviceReading {
    pub kind: DeviceKind,
    /// Stable device name, e.g. `alsa_output.pci-0000_00_1f.3.analog-stereo`.
    pub name: String,
    /// Human readable description shown to the user.
    pub label: String,
    pub channels: Vec<u32>,
    pub muted: bool,
}

impl DeviceReading {
    pub fn new(
        kind: DeviceKind,
        name: String,
        label: String,
        channels: Vec<u32>,
        muted: bool,
    ) -> Self {
        Self { kind, name, label, channels, muted }
    }
}

use async_trait::async_trait;

#[async_trait]
pub trait AudioServer: Send + Sync {
    async fn sink_info(&self, index: u32) -> Result<DeviceReading, AudioError>;
    async fn source_info(&self, index: u32) -> Result<DeviceReading, AudioError>;

    async fn device_info(&self, kind: DeviceKind, index: u32) -> Result<DeviceReading, AudioError> {
        match kind {
            DeviceKind::Sink => self.sink_info(index).await,
            DeviceKind::Source => self.source_info(index).await,
        }
    }

    async fn disconnect(&self) -> Result<(), AudioError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedServer;

    #[async_trait]
    impl AudioServer for FixedServer {
        async fn sink_info(&self, index: u32) -> Result<DeviceReading, AudioError> {
            Ok(DeviceReading::new(
                DeviceKind::Sink,
                format!("sink-{}", index),
                "Speakers".to_string(),
                vec![65536],
                false,
            ))
        }

        async fn source_info(&self, index: u32) -> Result<DeviceReading, AudioError> {
            Err(AudioError::NotFound { kind: DeviceKind::Source, index })
        }
    }

    #[test]
    fn test_device_kind_display() {
        assert_eq!(DeviceKind::Sink.to_string(), "sink");
        assert_eq!(DeviceKind::Source.to_string(), "source");
    }

    #[test]
    fn test_change_event_new() {
        let event = ChangeEvent::new(DeviceKind::Source, 7, ChangeKind::Change);
        assert_eq!(event.facility, DeviceKind::Source);
        assert_eq!(event.index, 7);
        assert_eq!(event.kind, ChangeKind::Change);
    }

    #[tokio::test]
    async fn test_device_info_routes_by_kind() {
        let server = FixedServer;

        let sink = server.device_info(DeviceKind::Sink, 3).await.unwrap();
        assert_eq!(sink.name, "sink-3");
        assert_eq!(sink.kind, DeviceKind::Sink);

        let source = server.device_info(DeviceKind::Source, 3).await;
        assert!(matches!(source, Err(AudioError::NotFound { kind: DeviceKind::Source, index: 3 })));
    }

    #[tokio::test]
    async fn test_disconnect_default() {
        tokio_test::assert_ok!(FixedServer.disconnect().await);
    }
}
