pub mod config;
pub mod daemon;
pub mod notify;
pub mod pulse;
pub mod volume;

pub use config::{Config, NotifyConfig, PulseConfig};
pub use daemon::{Classifier, Daemon, DaemonError, DedupStore};
pub use notify::{
    DbusNotifier, Dispatcher, Notification, NotificationRequest, NotificationTransport,
    NotifyError,
};
pub use pulse::{
    AudioError, AudioServer, ChangeEvent, ChangeKind, DeviceKind, DeviceReading, PulseServer,
    VOLUME_NORM,
};
pub use volume::{resolve, DisplayVolume, RoundingPolicy, VolumeError};
