pub mod client;
pub mod error;
pub mod types;

pub use client::{PulseServer, VOLUME_NORM};
pub use error::AudioError;
pub use types::{AudioServer, ChangeEvent, ChangeKind, DeviceKind, DeviceReading};
