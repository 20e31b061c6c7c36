/// Whole-table view of chrome.storage.local
use serde_json::{Map, Value};

use crate::activity::{TabTimestamps, parse_tab_key};
use crate::settings::Settings;

/// Everything in storage, split into settings and tab timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct StorageSnapshot {
    pub settings: Settings,
    pub timestamps: TabTimestamps,
    /// Length of the serialized table, the storage footprint
    pub bytes: usize,
}

impl StorageSnapshot {
    /// Build from the object returned by `chrome.storage.local.get(null)`
    pub fn from_value(value: Value) -> Self {
        let bytes = serde_json::to_string(&value).map_or(0, |s| s.len());
        let map = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        StorageSnapshot {
            timestamps: timestamps_from_map(&map),
            settings: settings_from_map(map),
            bytes,
        }
    }

    pub fn tracked_tabs(&self) -> usize {
        self.timestamps.len()
    }

    /// Ids of every tab record, sorted
    pub fn tracked_tab_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.timestamps.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for StorageSnapshot {
    fn default() -> Self {
        StorageSnapshot::from_value(Value::Object(Map::new()))
    }
}

/// Parse settings out of a storage document; anything unreadable becomes the default
pub fn settings_from_map(map: Map<String, Value>) -> Settings {
    serde_json::from_value(Value::Object(map)).unwrap_or_default()
}

/// Pick the numeric tab-id keys out of a storage document
pub fn timestamps_from_map(map: &Map<String, Value>) -> TabTimestamps {
    map.iter()
        .filter_map(|(key, value)| {
            let id = parse_tab_key(key)?;
            let stamp = value.as_f64().filter(|s| s.is_finite())?;
            Some((id, stamp))
        })
        .collect()
}
