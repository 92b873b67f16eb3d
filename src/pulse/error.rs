use crate::pulse::types::DeviceKind;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Failed to connect to PulseAudio: {0}")]
    Connection(String),
    #[error("Failed to subscribe to PulseAudio events: {0}")]
    Subscription(String),
    #[error("Failed to query {kind} #{index}: {reason}")]
    Query {
        kind: DeviceKind,
        index: u32,
        reason: String,
    },
    #[error("No {kind} with index {index}")]
    NotFound { kind: DeviceKind, index: u32 },
    #[error("PulseAudio connection is closed")]
    Disconnected,
}
