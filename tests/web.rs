//! Browser tests, run with `wasm-pack test --headless --chrome`
#![cfg(target_arch = "wasm32")]

use idle_tab_closer::checker::plan_sweep;
use idle_tab_closer::messages::Request;
use idle_tab_closer::settings::{HOUR_MS, Settings};
use idle_tab_closer::storage::StorageSnapshot;
use idle_tab_closer::tab_data::TabInfo;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js_object(json: &str) -> JsValue {
    js_sys::JSON::parse(json).unwrap()
}

#[wasm_bindgen_test]
fn test_tabs_from_js_query_result() {
    let tabs_js = js_object(
        r#"[
            {"id": 1, "windowId": 1, "url": "https://example.com", "title": "Example", "active": true},
            {"id": 2, "windowId": 1, "url": "https://rust-lang.org", "title": "Rust", "active": false}
        ]"#,
    );

    let tabs: Vec<TabInfo> = serde_wasm_bindgen::from_value(tabs_js).unwrap();

    assert_eq!(tabs.len(), 2);
    assert!(tabs[0].active);
    assert_eq!(tabs[1].title, "Rust");
}

#[wasm_bindgen_test]
fn test_snapshot_from_js_storage() {
    let storage_js = js_object(
        r#"{
            "autoCloseEnabled": true,
            "inactiveThreshold": 3600000,
            "whitelist": ["example.com"],
            "2": 1700000000000
        }"#,
    );

    let value: serde_json::Value = serde_wasm_bindgen::from_value(storage_js).unwrap();
    let snapshot = StorageSnapshot::from_value(value);

    assert!(snapshot.settings.auto_close_enabled);
    assert_eq!(snapshot.settings.inactive_threshold_ms, HOUR_MS);
    assert_eq!(snapshot.timestamps[&2], 1_700_000_000_000.0);
}

#[wasm_bindgen_test]
fn test_message_from_js() {
    let message = js_object(r#"{"action": "resetAllTabTimes", "hours": 24}"#);

    let value: serde_json::Value = serde_wasm_bindgen::from_value(message).unwrap();

    assert_eq!(
        Request::from_json(value).unwrap(),
        Request::ResetAllTabTimes { hours: 24.0 }
    );
}

#[wasm_bindgen_test]
fn test_whitelisted_tab_survives_sweep() {
    let now = js_sys::Date::now();
    let settings = Settings {
        auto_close_enabled: true,
        test_mode: true,
        whitelist: vec!["example.com".to_string()],
        ..Settings::default()
    };
    let tabs = vec![
        TabInfo::new(1, "https://example.com".to_string(), "Example".to_string(), false, 1),
        TabInfo::new(2, "https://other.org".to_string(), "Other".to_string(), false, 1),
    ];
    let timestamps = [(1, now - 2.0 * 60_000.0), (2, now - 2.0 * 60_000.0)]
        .into_iter()
        .collect();

    let plan = plan_sweep(&settings, &tabs, &timestamps, now);

    assert_eq!(plan.close.len(), 1);
    assert_eq!(plan.close[0].id, 2);
}
