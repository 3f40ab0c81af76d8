//! # Zone Cache
//!
//! Last-known contents of zones that were removed from the live document.
//!
//! A zone leaves the document when its owner stops rendering it (or when the
//! whole document is flushed). When the zone re-registers it pulls its items
//! back out of the cache instead of starting empty. Entries are overwritten,
//! never expired; the cache lives exactly as long as its [`crate::EditSession`].

use dropzone_document::{ComponentItem, Data};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ZoneCache {
    zones: HashMap<String, Vec<ComponentItem>>,
}

impl ZoneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a zone's items, overwriting any previous entry
    pub fn put(&mut self, zone: impl Into<String>, items: Vec<ComponentItem>) {
        self.zones.insert(zone.into(), items);
    }

    pub fn get(&self, zone: &str) -> Option<&[ComponentItem]> {
        self.zones.get(zone).map(Vec::as_slice)
    }

    pub fn contains(&self, zone: &str) -> bool {
        self.zones.contains_key(zone)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Whether any cached zone holds an item with this id
    pub fn contains_id(&self, id: &str) -> bool {
        self.zones
            .values()
            .flatten()
            .any(|item| item.id() == Some(id))
    }

    /// Copy every non-root zone into the cache, then empty `data.zones`
    ///
    /// The root zone lives in `data.content` and is left alone.
    pub fn flush(&mut self, data: &mut Data) {
        for (zone, items) in std::mem::take(&mut data.zones) {
            self.put(zone, items);
        }
    }

    /// Restore a cached zone into `data` unless the document already holds it
    ///
    /// A cached zone whose items collide with live ids stays in the cache.
    /// Returns whether anything was restored.
    pub fn restore(&self, data: &mut Data, zone: &str) -> bool {
        if data.zone(zone).is_some() {
            return false;
        }

        let Some(items) = self.zones.get(zone) else {
            return false;
        };

        if let Some(id) = items
            .iter()
            .filter_map(ComponentItem::id)
            .find(|id| data.contains_id(id))
        {
            tracing::warn!("restore: zone {} holds live id {}, skipping", zone, id);
            return false;
        }

        data.zones.insert(zone.to_string(), items.clone());
        true
    }

    /// Move a live zone out of `data` and into the cache
    ///
    /// Returns whether the zone was present.
    pub fn evict(&mut self, data: &mut Data, zone: &str) -> bool {
        match data.zones.remove(zone) {
            Some(items) => {
                self.put(zone, items);
                true
            }
            None => false,
        }
    }
}
