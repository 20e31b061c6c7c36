/// Data structures for tabs as reported by chrome.tabs.query
use serde::{Deserialize, Serialize};

/// Information about a browser tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: i32,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub window_id: i32,
}

impl TabInfo {
    pub fn new(id: i32, url: String, title: String, active: bool, window_id: i32) -> TabInfo {
        TabInfo {
            id,
            url,
            title,
            active,
            window_id,
        }
    }

    /// Title for logs and notifications, falling back to the URL
    pub fn label(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_info_creation() {
        let tab = TabInfo::new(
            1,
            "https://google.com".to_string(),
            "Google".to_string(),
            false,
            3,
        );

        assert_eq!(tab.id, 1);
        assert_eq!(tab.url, "https://google.com");
        assert_eq!(tab.title, "Google");
        assert!(!tab.active);
        assert_eq!(tab.window_id, 3);
    }

    #[test]
    fn test_deserialize_chrome_tab() {
        // chrome.tabs.Tab carries many more fields than we use
        let json = r#"{
            "id": 42,
            "windowId": 7,
            "index": 0,
            "url": "https://example.com/",
            "title": "Example",
            "active": true,
            "pinned": false,
            "status": "complete"
        }"#;

        let tab: TabInfo = serde_json::from_str(json).unwrap();

        assert_eq!(tab.id, 42);
        assert_eq!(tab.window_id, 7);
        assert!(tab.active);
    }

    #[test]
    fn test_deserialize_tab_without_url() {
        let tab: TabInfo = serde_json::from_str(r#"{"id": 5}"#).unwrap();

        assert_eq!(tab.url, "");
        assert_eq!(tab.title, "");
        assert!(!tab.active);
    }

    #[test]
    fn test_label_falls_back_to_url() {
        let tab = TabInfo::new(1, "https://a.com".to_string(), "  ".to_string(), false, 1);
        assert_eq!(tab.label(), "https://a.com");

        let tab = TabInfo::new(1, "https://a.com".to_string(), "A".to_string(), false, 1);
        assert_eq!(tab.label(), "A");
    }
}
