/// Background service worker: listeners, the periodic sweep and runtime messages

use std::cell::RefCell;

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;
use wasm_bindgen::prelude::*;

use crate::activity::{self, TabTimestamps, is_activity_update, is_main_frame, tab_key};
use crate::checker::{CloseOutcome, closed_notice, plan_sweep, settle_sweep};
use crate::error::ExtensionError;
use crate::messages::{ActionResponse, AlarmInfo, DebugInfo, Request, closed_message, reset_message};
use crate::monitor::PerformanceMonitor;
use crate::settings::{ALARM_NAME, Settings};
use crate::storage::StorageSnapshot;
use crate::tab_data::TabInfo;

// Import JS bridge functions
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryAllTabs() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeTab(tab_id: i32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(items: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeStorage(keys: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn createAlarm(name: &str, period_in_minutes: f64) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn clearAlarm(name: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getAlarm(name: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn createNotification(id: &str, title: &str, message: &str) -> Result<(), JsValue>;
}

thread_local! {
    static MONITOR: RefCell<PerformanceMonitor> = RefCell::new(PerformanceMonitor::new(js_sys::Date::now()));
}

// Listener entry points, called from service_worker.js

#[wasm_bindgen]
pub async fn on_installed() {
    log_failure("sync alarm on install", sync_alarm().await);
}

#[wasm_bindgen]
pub async fn on_startup() {
    log_failure("clear previous session's tab records", forget_previous_session().await);
    log_failure("sync alarm on startup", sync_alarm().await);
}

#[wasm_bindgen]
pub async fn on_tab_activated(tab_id: i32) {
    log_failure("record activation", touch_tab(tab_id).await);
}

#[wasm_bindgen]
pub async fn on_tab_updated(tab_id: i32, status: Option<String>) {
    if is_activity_update(status.as_deref()) {
        log_failure("record page load", touch_tab(tab_id).await);
    }
}

#[wasm_bindgen]
pub async fn on_navigation_committed(tab_id: i32, frame_id: i32) {
    if is_main_frame(frame_id) {
        log_failure("record navigation", touch_tab(tab_id).await);
    }
}

#[wasm_bindgen]
pub async fn on_tab_removed(tab_id: i32) {
    log_failure("forget removed tab", forget_tabs(&[tab_id]).await);
}

#[wasm_bindgen]
pub async fn on_alarm(name: String) {
    if name == ALARM_NAME {
        log_failure("inactive tab check", check_and_close_inactive_tabs().await.map(|_| ()));
    }
}

/// Answer a popup message; the returned promise resolves to the reply
#[wasm_bindgen]
pub async fn handle_message(message: JsValue) -> Result<JsValue, JsValue> {
    let request = serde_wasm_bindgen::from_value::<Value>(message)
        .map_err(ExtensionError::from)
        .and_then(Request::from_json);

    let reply = match request {
        Ok(request) => dispatch(request).await,
        Err(e) => Err(e),
    };

    match reply {
        Ok(reply) => Ok(reply),
        Err(e) => {
            log::error!("Message handling failed: {}", e);
            Ok(to_js(&ActionResponse::failed(e.to_string()))?)
        }
    }
}

async fn dispatch(request: Request) -> Result<JsValue, ExtensionError> {
    log::debug!("Handling message: {:?}", request);

    match request {
        Request::GetDebugInfo => to_js(&debug_info().await?),
        Request::ForceCheck => {
            let closed = check_and_close_inactive_tabs().await?;
            to_js(&ActionResponse::ok(closed_message(closed)))
        }
        Request::ResetAllTabTimes { hours } => {
            let tabs = query_all_tabs().await?;
            let hours = activity::effective_reset_hours(hours);
            let reset = activity::reset_tab_times(&tabs, hours, js_sys::Date::now());
            write_timestamps(&reset).await?;
            log::info!("Reset {} tab timestamps to {} hours ago", reset.len(), hours);
            to_js(&ActionResponse::ok(reset_message(reset.len(), hours)))
        }
    }
}

/// One sweep: close every tab that has been inactive for too long
///
/// Returns the number of tabs actually closed. Failures on individual tabs
/// are logged and skipped.
pub async fn check_and_close_inactive_tabs() -> Result<usize, ExtensionError> {
    let started = js_sys::Date::now();
    let snapshot = load_snapshot().await?;

    if !snapshot.settings.auto_close_enabled {
        log::debug!("Auto-close disabled, skipping check");
        return Ok(0);
    }

    let tabs = query_all_tabs().await?;
    let now = js_sys::Date::now();
    let plan = plan_sweep(&snapshot.settings, &tabs, &snapshot.timestamps, now);
    let threshold = snapshot.settings.effective_threshold_ms();

    log::info!(
        "Checking {} tabs (threshold {} ms): {} to close, {} active, {} whitelisted",
        tabs.len(),
        threshold,
        plan.close.len(),
        plan.skipped_active,
        plan.skipped_whitelisted
    );

    let mut outcomes = Vec::with_capacity(plan.close.len());
    for tab in &plan.close {
        let removed = match removeTab(tab.id).await {
            Ok(()) => {
                log::info!("Closed inactive tab: {}", tab.label());
                notify_closed(tab, threshold).await;
                true
            }
            Err(e) => {
                log::warn!("{}", ExtensionError::bridge("tabs.remove", e));
                false
            }
        };
        outcomes.push(CloseOutcome { tab_id: tab.id, removed });
    }

    let records = settle_sweep(&plan, &outcomes, now);
    if !records.write.is_empty() {
        log_failure("record first-seen tabs", write_timestamps(&records.write).await);
    }
    if !records.forget.is_empty() {
        log_failure("prune stale timestamps", forget_tabs(&records.forget).await);
    }

    let elapsed = js_sys::Date::now() - started;
    MONITOR.with(|monitor| {
        let mut monitor = monitor.borrow_mut();
        monitor.record_storage_bytes(snapshot.bytes);
        if monitor.end_check(elapsed, tabs.len(), records.closed) {
            log::info!("Performance: {}", monitor.summary(js_sys::Date::now()));
        }
    });

    Ok(records.closed)
}

/// Tab ids restart with every browser session, so old records would be
/// inherited by unrelated tabs
async fn forget_previous_session() -> Result<(), ExtensionError> {
    let ids = load_snapshot().await?.tracked_tab_ids();
    if ids.is_empty() {
        return Ok(());
    }
    log::info!("Clearing {} tab records from the previous session", ids.len());
    forget_tabs(&ids).await
}

/// Create or clear the periodic alarm to match the stored settings
pub async fn sync_alarm() -> Result<(), ExtensionError> {
    let settings = load_snapshot().await?.settings;
    apply_alarm(&settings).await
}

pub async fn apply_alarm(settings: &Settings) -> Result<(), ExtensionError> {
    match settings.alarm_period_minutes() {
        Some(period) => {
            createAlarm(ALARM_NAME, period)
                .await
                .map_err(|e| ExtensionError::bridge("alarms.create", e))?;
            log::info!("Inactive tab check scheduled every {} min", period);
        }
        None => {
            clearAlarm(ALARM_NAME)
                .await
                .map_err(|e| ExtensionError::bridge("alarms.clear", e))?;
            log::info!("Inactive tab check disabled");
        }
    }
    Ok(())
}

async fn debug_info() -> Result<DebugInfo, ExtensionError> {
    let snapshot = load_snapshot().await?;
    let tabs = query_all_tabs().await?;

    let alarm_js = getAlarm(ALARM_NAME)
        .await
        .map_err(|e| ExtensionError::bridge("alarms.get", e))?;
    let alarm: Option<AlarmInfo> = if alarm_js.is_null() || alarm_js.is_undefined() {
        None
    } else {
        Some(serde_wasm_bindgen::from_value(alarm_js)?)
    };

    let performance = MONITOR.with(|monitor| {
        let mut monitor = monitor.borrow_mut();
        monitor.record_storage_bytes(snapshot.bytes);
        monitor.report(js_sys::Date::now())
    });

    Ok(DebugInfo {
        effective_threshold_ms: snapshot.settings.effective_threshold_ms(),
        check_period_minutes: snapshot.settings.alarm_period_minutes(),
        open_tabs: tabs.len(),
        tracked_tabs: snapshot.tracked_tabs(),
        storage_bytes: snapshot.bytes,
        alarm,
        performance,
        settings: snapshot.settings,
    })
}

async fn touch_tab(tab_id: i32) -> Result<(), ExtensionError> {
    let mut stamp = TabTimestamps::new();
    stamp.insert(tab_id, js_sys::Date::now());
    write_timestamps(&stamp).await
}

async fn write_timestamps(timestamps: &TabTimestamps) -> Result<(), ExtensionError> {
    let items = Value::Object(activity::to_storage_entries(timestamps));
    setStorage(to_js(&items)?)
        .await
        .map_err(|e| ExtensionError::bridge("storage.set", e))
}

async fn forget_tabs(tab_ids: &[i32]) -> Result<(), ExtensionError> {
    let keys: Vec<String> = tab_ids.iter().map(|id| tab_key(*id)).collect();
    removeStorage(to_js(&keys)?)
        .await
        .map_err(|e| ExtensionError::bridge("storage.remove", e))
}

async fn load_snapshot() -> Result<StorageSnapshot, ExtensionError> {
    let all = getStorage(JsValue::NULL)
        .await
        .map_err(|e| ExtensionError::bridge("storage.get", e))?;

    if all.is_null() || all.is_undefined() {
        return Ok(StorageSnapshot::default());
    }

    let value: Value = serde_wasm_bindgen::from_value(all)?;
    Ok(StorageSnapshot::from_value(value))
}

async fn query_all_tabs() -> Result<Vec<TabInfo>, ExtensionError> {
    let tabs_js = queryAllTabs()
        .await
        .map_err(|e| ExtensionError::bridge("tabs.query", e))?;
    Ok(serde_wasm_bindgen::from_value(tabs_js)?)
}

async fn notify_closed(tab: &TabInfo, threshold_ms: f64) {
    let notice = closed_notice(tab, threshold_ms);
    let id = format!("inactive-tab-{}", Uuid::new_v4());

    if let Err(e) = createNotification(&id, &notice.title, &notice.message).await {
        log::warn!("{}", ExtensionError::bridge("notifications.create", e));
    }
}

// Plain objects instead of JS Maps so chrome.storage accepts them
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, ExtensionError> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

fn log_failure(what: &str, result: Result<(), ExtensionError>) {
    if let Err(e) = result {
        log::error!("Failed to {}: {}", what, e);
    }
}
