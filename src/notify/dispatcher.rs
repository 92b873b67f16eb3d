use std::collections::BTreeMap;

use super::error::NotifyError;
use super::types::{
    Notification, NotificationRequest, NotificationTransport, EXPIRE_SERVER_DEFAULT, VALUE_HINT,
};
use crate::pulse::DeviceKind;

// Nerd Font glyphs.
pub const SINK_ICON: &str = "\u{f485}";
pub const SINK_ICON_MUTED: &str = "\u{f466}";
pub const SOURCE_ICON: &str = "\u{f130}";
pub const SOURCE_ICON_MUTED: &str = "\u{f131}";

pub fn icon(kind: DeviceKind, muted: bool) -> &'static str {
    match (kind, muted) {
        (DeviceKind::Sink, false) => SINK_ICON,
        (DeviceKind::Sink, true) => SINK_ICON_MUTED,
        (DeviceKind::Source, false) => SOURCE_ICON,
        (DeviceKind::Source, true) => SOURCE_ICON_MUTED,
    }
}

pub fn summary(request: &NotificationRequest) -> String {
    format!("Volume: {}", request.label)
}

pub fn body(request: &NotificationRequest) -> String {
    let icon = icon(request.kind, request.is_muted());
    if request.is_muted() {
        format!("{}  MUTED", icon)
    } else {
        format!("{}  Current level: {}%", icon, request.percent)
    }
}

/// Turns notification requests into desktop notifications.
pub struct Dispatcher {
    transport: Box<dyn NotificationTransport>,
    app_name: String,
}

impl Dispatcher {
    pub fn new(transport: Box<dyn NotificationTransport>, app_name: String) -> Self {
        Self { transport, app_name }
    }

    pub fn build(&self, request: &NotificationRequest) -> Notification {
        let mut hints = BTreeMap::new();
        hints.insert(VALUE_HINT.to_string(), i32::try_from(request.percent).unwrap_or(i32::MAX));

        Notification {
            app_name: self.app_name.clone(),
            summary: summary(request),
            body: body(request),
            expire_timeout: EXPIRE_SERVER_DEFAULT,
            hints,
        }
    }

    pub async fn dispatch(&self, request: &NotificationRequest) -> Result<u32, NotifyError> {
        let notification = self.build(request);
        let id = self.transport.send(&notification).await?;
        tracing::debug!("Sent notification {} for {} '{}'", id, request.kind, request.label);
        Ok(id)
    }

    pub async fn close(&self) -> Result<(), NotifyError> {
        self.transport.close().await
    }
}
