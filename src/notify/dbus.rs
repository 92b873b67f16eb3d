use std::collections::HashMap;

use async_trait::async_trait;
use zbus::zvariant::Value;
use zbus::Connection;

use super::error::NotifyError;
use super::types::{Notification, NotificationTransport};

#[zbus::proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: &HashMap<&str, &Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

/// Desktop notifications over the freedesktop session bus.
#[derive(Debug)]
pub struct DbusNotifier {
    connection: Connection,
    proxy: NotificationsProxy<'static>,
}

impl DbusNotifier {
    pub async fn connect() -> Result<Self, NotifyError> {
        let connection = Connection::session().await.map_err(NotifyError::Connection)?;
        let proxy = NotificationsProxy::new(&connection)
            .await
            .map_err(NotifyError::Connection)?;
        tracing::info!("Connected to the session bus");
        Ok(Self { connection, proxy })
    }
}

#[async_trait]
impl NotificationTransport for DbusNotifier {
    async fn send(&self, notification: &Notification) -> Result<u32, NotifyError> {
        let values: Vec<(&str, Value<'_>)> = notification
            .hints
            .iter()
            .map(|(key, value)| (key.as_str(), Value::from(*value)))
            .collect();
        let hints: HashMap<&str, &Value<'_>> =
            values.iter().map(|(key, value)| (*key, value)).collect();

        self.proxy
            .notify(
                &notification.app_name,
                0,
                "",
                &notification.summary,
                &notification.body,
                &[],
                &hints,
                notification.expire_timeout,
            )
            .await
            .map_err(NotifyError::Send)
    }

    async fn close(&self) -> Result<(), NotifyError> {
        self.connection
            .clone()
            .close()
            .await
            .map_err(NotifyError::Connection)?;
        tracing::debug!("Closed session bus connection");
        Ok(())
    }
}
