use super::dedup::DedupStore;
use crate::notify::NotificationRequest;
use crate::pulse::{AudioServer, ChangeEvent, ChangeKind, DeviceReading, VOLUME_NORM};
use crate::volume::{resolve, DisplayVolume, RoundingPolicy, VolumeError};

/// Decides which change events are worth telling the user about.
///
/// Owns the [`DedupStore`]; a request is only produced when a device's display
/// volume differs from the last one announced for it.
#[derive(Debug)]
pub struct Classifier {
    store: DedupStore,
    rounding: RoundingPolicy,
    ignore_label: String,
}

impl Classifier {
    pub fn new(rounding: RoundingPolicy, ignore_label: String) -> Self {
        Self {
            store: DedupStore::new(),
            rounding,
            ignore_label,
        }
    }

    pub fn store(&self) -> &DedupStore {
        &self.store
    }

    pub async fn classify(
        &mut self,
        server: &dyn AudioServer,
        event: &ChangeEvent,
    ) -> Option<NotificationRequest> {
        if event.kind != ChangeKind::Change {
            tracing::trace!("Ignoring {:?}", event);
            return None;
        }

        let reading = match server.device_info(event.facility, event.index).await {
            Ok(reading) => reading,
            Err(e) => {
                tracing::warn!("Skipping {} #{}: {}", event.facility, event.index, e);
                return None;
            }
        };

        self.observe(reading)
    }

    /// Runs a fresh reading through the monitor filter and the dedup store.
    pub fn observe(&mut self, reading: DeviceReading) -> Option<NotificationRequest> {
        if !self.ignore_label.is_empty() && reading.label.contains(&self.ignore_label) {
            tracing::trace!("Ignoring monitor device '{}'", reading.label);
            return None;
        }

        let volume = match display_volume(&reading) {
            Ok(volume) => volume,
            Err(e) => {
                tracing::warn!("Skipping {} '{}': {}", reading.kind, reading.name, e);
                return None;
            }
        };

        if self.store.get(reading.kind, &reading.name) == Some(volume) {
            tracing::trace!("{} '{}' unchanged at {}", reading.kind, reading.name, volume.as_f64());
            return None;
        }

        self.store.set(reading.kind, &reading.name, volume);
        tracing::debug!("{} '{}' is now {}", reading.kind, reading.name, volume.as_f64());

        Some(NotificationRequest::new(
            reading.kind,
            reading.label,
            volume,
            volume.percent(self.rounding),
        ))
    }
}

fn display_volume(reading: &DeviceReading) -> Result<DisplayVolume, VolumeError> {
    if reading.muted {
        return Ok(DisplayVolume::Muted);
    }
    resolve(&reading.channels, VOLUME_NORM).map(DisplayVolume::Level)
}
