/// User settings persisted in chrome.storage.local
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

pub const KEY_AUTO_CLOSE: &str = "autoCloseEnabled";
pub const KEY_THRESHOLD: &str = "inactiveThreshold";
pub const KEY_TEST_MODE: &str = "testMode";
pub const KEY_WHITELIST: &str = "whitelist";

/// Storage keys read when loading settings
pub const SETTINGS_KEYS: [&str; 4] = [KEY_AUTO_CLOSE, KEY_THRESHOLD, KEY_TEST_MODE, KEY_WHITELIST];

pub const HOUR_MS: f64 = 60.0 * 60.0 * 1000.0;
pub const DEFAULT_THRESHOLD_HOURS: u32 = 24;
pub const DEFAULT_THRESHOLD_MS: f64 = DEFAULT_THRESHOLD_HOURS as f64 * HOUR_MS;
pub const TEST_MODE_THRESHOLD_MS: f64 = 60.0 * 1000.0;

pub const ALARM_NAME: &str = "checkInactiveTabs";
pub const CHECK_PERIOD_MINUTES: f64 = 5.0;
pub const TEST_MODE_CHECK_PERIOD_MINUTES: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, deserialize_with = "lenient")]
    pub auto_close_enabled: bool,
    #[serde(
        rename = "inactiveThreshold",
        default = "default_threshold",
        deserialize_with = "threshold"
    )]
    pub inactive_threshold_ms: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub test_mode: bool,
    #[serde(default, deserialize_with = "string_entries")]
    pub whitelist: Vec<String>,
}

impl Settings {
    /// Threshold the checker actually applies
    pub fn effective_threshold_ms(&self) -> f64 {
        if self.test_mode {
            TEST_MODE_THRESHOLD_MS
        } else {
            self.inactive_threshold_ms
        }
    }

    /// Alarm period, or None when no alarm should be scheduled
    pub fn alarm_period_minutes(&self) -> Option<f64> {
        if !self.auto_close_enabled {
            return None;
        }

        Some(if self.test_mode {
            TEST_MODE_CHECK_PERIOD_MINUTES
        } else {
            CHECK_PERIOD_MINUTES
        })
    }

    pub fn threshold_hours(&self) -> f64 {
        self.inactive_threshold_ms / HOUR_MS
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            auto_close_enabled: false,
            inactive_threshold_ms: DEFAULT_THRESHOLD_MS,
            test_mode: false,
            whitelist: Vec::new(),
        }
    }
}

/// Parse the popup's hour field the way `parseInt(value) || 24` would,
/// except that negative values also fall back to the default
pub fn hours_from_input(input: &str) -> u32 {
    let trimmed = input.trim();
    let digits_end = trimmed
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(trimmed.len(), |(i, _)| i);

    match trimmed[..digits_end].parse::<u32>() {
        Ok(hours) if hours > 0 => hours,
        _ => DEFAULT_THRESHOLD_HOURS,
    }
}

pub fn hours_to_ms(hours: u32) -> f64 {
    hours as f64 * HOUR_MS
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD_MS
}

// Wrong types in storage fall back to the default instead of failing the whole read
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

// Bad elements are dropped one by one; the rest of the list still protects its domains
fn string_entries<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let entries = match value {
        serde_json::Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(entries
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
        .collect())
}

fn threshold<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_f64()
        .filter(|ms| ms.is_finite() && *ms > 0.0)
        .unwrap_or(DEFAULT_THRESHOLD_MS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_empty_storage() {
        let settings: Settings = serde_json::from_value(json!({})).unwrap();

        assert_eq!(settings, Settings::default());
        assert!(!settings.auto_close_enabled);
        assert_eq!(settings.inactive_threshold_ms, 86_400_000.0);
    }

    #[test]
    fn test_reads_storage_keys() {
        let settings: Settings = serde_json::from_value(json!({
            "autoCloseEnabled": true,
            "inactiveThreshold": 7_200_000,
            "testMode": false,
            "whitelist": ["example.com", "github.com"],
        }))
        .unwrap();

        assert!(settings.auto_close_enabled);
        assert_eq!(settings.inactive_threshold_ms, 7_200_000.0);
        assert_eq!(settings.threshold_hours(), 2.0);
        assert_eq!(settings.whitelist, vec!["example.com", "github.com"]);
    }

    #[test]
    fn test_zero_or_garbage_threshold_uses_default() {
        for raw in [json!(0), json!(-5), json!("soon"), json!(null)] {
            let settings: Settings =
                serde_json::from_value(json!({ "inactiveThreshold": raw })).unwrap();
            assert_eq!(settings.inactive_threshold_ms, DEFAULT_THRESHOLD_MS);
        }
    }

    #[test]
    fn test_malformed_fields_fall_back() {
        let settings: Settings = serde_json::from_value(json!({
            "autoCloseEnabled": "yes",
            "whitelist": "example.com",
        }))
        .unwrap();

        assert!(!settings.auto_close_enabled);
        assert!(settings.whitelist.is_empty());
    }

    #[test]
    fn test_whitelist_keeps_string_entries_among_garbage() {
        let settings: Settings = serde_json::from_value(json!({
            "autoCloseEnabled": true,
            "whitelist": ["example.com", 5, null, "", "github.com", {"domain": "x.com"}],
        }))
        .unwrap();

        assert_eq!(settings.whitelist, vec!["example.com", "github.com"]);
    }

    #[test]
    fn test_whitelisted_tab_survives_malformed_list() {
        use crate::checker::plan_sweep;
        use crate::tab_data::TabInfo;

        let settings: Settings = serde_json::from_value(json!({
            "autoCloseEnabled": true,
            "whitelist": ["example.com", 5],
        }))
        .unwrap();
        let tabs = vec![TabInfo::new(1, "https://example.com".to_string(), "Example".to_string(), false, 1)];
        let timestamps = [(1, 0.0)].into_iter().collect();

        let plan = plan_sweep(&settings, &tabs, &timestamps, 1_700_000_000_000.0);

        assert!(plan.close.is_empty());
        assert_eq!(plan.skipped_whitelisted, 1);
    }

    #[test]
    fn test_serializes_with_storage_keys() {
        let value = serde_json::to_value(Settings::default()).unwrap();

        for key in SETTINGS_KEYS {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_effective_threshold() {
        let mut settings = Settings {
            inactive_threshold_ms: hours_to_ms(3),
            ..Settings::default()
        };
        assert_eq!(settings.effective_threshold_ms(), 10_800_000.0);

        settings.test_mode = true;
        assert_eq!(settings.effective_threshold_ms(), 60_000.0);
    }

    #[test]
    fn test_alarm_period() {
        let mut settings = Settings::default();
        assert_eq!(settings.alarm_period_minutes(), None);

        settings.auto_close_enabled = true;
        assert_eq!(settings.alarm_period_minutes(), Some(5.0));

        settings.test_mode = true;
        assert_eq!(settings.alarm_period_minutes(), Some(0.5));
    }

    #[test]
    fn test_hours_from_input() {
        assert_eq!(hours_from_input("12"), 12);
        assert_eq!(hours_from_input(" 48 "), 48);
        assert_eq!(hours_from_input("1.5"), 1);
        assert_eq!(hours_from_input("6h"), 6);
        assert_eq!(hours_from_input(""), 24);
        assert_eq!(hours_from_input("0"), 24);
        assert_eq!(hours_from_input("-3"), 24);
        assert_eq!(hours_from_input("abc"), 24);
    }
}
