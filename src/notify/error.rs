#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Failed to connect to the session bus: {0}")]
    Connection(#[source] zbus::Error),
    #[error("Failed to send notification: {0}")]
    Send(#[source] zbus::Error),
}
