use crate::notify::NotifyError;
use crate::pulse::AudioError;

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("Event channel closed unexpectedly")]
    EventsClosed,
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
