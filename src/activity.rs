/// Per-tab last-access timestamps
///
/// Each record lives at the top level of chrome.storage.local, keyed by the
/// tab id as a decimal string, with an epoch-millisecond number as value.

use std::collections::HashMap;

use crate::settings::HOUR_MS;
use crate::tab_data::TabInfo;

pub const DEFAULT_RESET_HOURS: f64 = 24.0;

/// Tab id → last observed activity (epoch ms)
pub type TabTimestamps = HashMap<i32, f64>;

pub fn tab_key(tab_id: i32) -> String {
    tab_id.to_string()
}

/// Inverse of `tab_key`; settings keys and other junk return None
pub fn parse_tab_key(key: &str) -> Option<i32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Should a `tabs.onUpdated` event count as activity?
pub fn is_activity_update(status: Option<&str>) -> bool {
    status == Some("complete")
}

/// Only the top-level frame counts; iframes navigate constantly
pub fn is_main_frame(frame_id: i32) -> bool {
    frame_id == 0
}

/// Hours actually applied by a reset; negative or non-finite input means 24
pub fn effective_reset_hours(hours: f64) -> f64 {
    if hours.is_finite() && hours >= 0.0 {
        hours
    } else {
        DEFAULT_RESET_HOURS
    }
}

/// Timestamps that make every non-active tab look `hours` old
///
/// Active tabs are left alone so the check never closes what the user is
/// looking at.
pub fn reset_tab_times(tabs: &[TabInfo], hours: f64, now: f64) -> TabTimestamps {
    let stamp = now - effective_reset_hours(hours) * HOUR_MS;

    tabs.iter()
        .filter(|tab| !tab.active)
        .map(|tab| (tab.id, stamp))
        .collect()
}

/// Render timestamps as a storage document for `chrome.storage.local.set`
pub fn to_storage_entries(timestamps: &TabTimestamps) -> serde_json::Map<String, serde_json::Value> {
    timestamps
        .iter()
        .map(|(id, stamp)| (tab_key(*id), serde_json::Value::from(*stamp)))
        .collect()
}
