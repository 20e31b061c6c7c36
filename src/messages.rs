/// Popup → background runtime messages
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::activity::DEFAULT_RESET_HOURS;
use crate::error::{ExtensionError, Result};
use crate::monitor::MonitorReport;
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    GetDebugInfo,
    ForceCheck,
    ResetAllTabTimes {
        #[serde(default = "default_reset_hours")]
        hours: f64,
    },
}

const KNOWN_ACTIONS: [&str; 3] = ["getDebugInfo", "forceCheck", "resetAllTabTimes"];

fn default_reset_hours() -> f64 {
    DEFAULT_RESET_HOURS
}

impl Request {
    /// Parse a message, reporting the action name when it is unknown
    ///
    /// Known actions with bad fields keep the underlying parse error.
    pub fn from_json(value: Value) -> Result<Request> {
        let action = value
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if !KNOWN_ACTIONS.contains(&action.as_str()) {
            return Err(ExtensionError::UnknownAction(action));
        }

        Ok(serde_json::from_value(value)?)
    }
}

/// Reply for actions that only report success and a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        ActionResponse {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ActionResponse {
            success: false,
            message: message.into(),
        }
    }
}

/// Alarm as returned by chrome.alarms.get
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmInfo {
    pub name: String,
    #[serde(default)]
    pub period_in_minutes: Option<f64>,
    #[serde(default)]
    pub scheduled_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub settings: Settings,
    pub effective_threshold_ms: f64,
    pub check_period_minutes: Option<f64>,
    pub open_tabs: usize,
    pub tracked_tabs: usize,
    pub storage_bytes: usize,
    pub alarm: Option<AlarmInfo>,
    pub performance: MonitorReport,
}

pub fn closed_message(count: usize) -> String {
    match count {
        0 => "No inactive tabs to close".to_string(),
        1 => "Closed 1 inactive tab".to_string(),
        n => format!("Closed {} inactive tabs", n),
    }
}

pub fn reset_message(count: usize, hours: f64) -> String {
    format!(
        "Reset {} tab{} to {} hours ago",
        count,
        if count == 1 { "" } else { "s" },
        hours
    )
}
