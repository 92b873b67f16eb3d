use std::collections::HashMap;

use crate::pulse::DeviceKind;
use crate::volume::DisplayVolume;

/// Last announced volume per device, kept separately for sinks and sources
/// since their names may collide.
#[derive(Debug, Default)]
pub struct DedupStore {
    sinks: HashMap<String, DisplayVolume>,
    sources: HashMap<String, DisplayVolume>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, kind: DeviceKind) -> &HashMap<String, DisplayVolume> {
        match kind {
            DeviceKind::Sink => &self.sinks,
            DeviceKind::Source => &self.sources,
        }
    }

    pub fn get(&self, kind: DeviceKind, id: &str) -> Option<DisplayVolume> {
        self.map(kind).get(id).copied()
    }

    pub fn set(&mut self, kind: DeviceKind, id: &str, value: DisplayVolume) {
        let map = match kind {
            DeviceKind::Sink => &mut self.sinks,
            DeviceKind::Source => &mut self.sources,
        };
        map.insert(id.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.sinks.len() + self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty() && self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_new() {
        let store = DedupStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.get(DeviceKind::Sink, "any"), None);
    }

    #[test]
    fn test_store_set_overwrites() {
        let mut store = DedupStore::new();
        store.set(DeviceKind::Sink, "speakers", DisplayVolume::Level(40.0));
        store.set(DeviceKind::Sink, "speakers", DisplayVolume::Muted);

        assert_eq!(store.get(DeviceKind::Sink, "speakers"), Some(DisplayVolume::Muted));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_kinds_are_independent() {
        let mut store = DedupStore::new();
        store.set(DeviceKind::Sink, "shared", DisplayVolume::Level(10.0));
        store.set(DeviceKind::Source, "shared", DisplayVolume::Level(90.0));

        assert_eq!(store.get(DeviceKind::Sink, "shared"), Some(DisplayVolume::Level(10.0)));
        assert_eq!(store.get(DeviceKind::Source, "shared"), Some(DisplayVolume::Level(90.0)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_source_write_leaves_sinks_untouched() {
        let mut store = DedupStore::new();
        store.set(DeviceKind::Source, "mic", DisplayVolume::Level(70.0));

        assert_eq!(store.get(DeviceKind::Sink, "mic"), None);
    }
}
