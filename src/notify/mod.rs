pub mod dbus;
pub mod dispatcher;
pub mod error;
pub mod types;

pub use dbus::DbusNotifier;
pub use dispatcher::Dispatcher;
pub use error::NotifyError;
pub use types::{
    Notification, NotificationRequest, NotificationTransport, EXPIRE_SERVER_DEFAULT, VALUE_HINT,
};
