/// Inactivity decisions: which tabs a sweep closes
use std::collections::HashSet;

use serde::Serialize;

use crate::activity::TabTimestamps;
use crate::domain::is_whitelisted;
use crate::settings::Settings;
use crate::tab_data::TabInfo;

/// Everything one sweep should do, computed without touching the browser
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepPlan {
    pub close: Vec<TabInfo>,
    /// Tabs with no recorded activity; stamped with `now`
    pub first_seen: Vec<i32>,
    /// Recorded ids with no matching open tab
    pub stale: Vec<i32>,
    pub skipped_active: usize,
    pub skipped_whitelisted: usize,
    pub examined: usize,
}

impl SweepPlan {
    pub fn is_noop(&self) -> bool {
        self.close.is_empty() && self.first_seen.is_empty() && self.stale.is_empty()
    }
}

/// Decide what to close
///
/// Rules:
/// 1. Auto-close disabled → empty plan
/// 2. Active tabs (any window) and whitelisted tabs are never candidates
/// 3. A tab with no timestamp counts as seen `now`
/// 4. `now - last >= threshold` closes the tab
pub fn plan_sweep(settings: &Settings, tabs: &[TabInfo], timestamps: &TabTimestamps, now: f64) -> SweepPlan {
    let mut plan = SweepPlan::default();

    if !settings.auto_close_enabled {
        return plan;
    }

    let threshold = settings.effective_threshold_ms();

    for tab in tabs {
        if tab.active {
            plan.skipped_active += 1;
            continue;
        }

        if is_whitelisted(&tab.url, &settings.whitelist) {
            plan.skipped_whitelisted += 1;
            continue;
        }

        plan.examined += 1;

        let last_access = match timestamps.get(&tab.id) {
            Some(stamp) => *stamp,
            None => {
                plan.first_seen.push(tab.id);
                now
            }
        };

        if now - last_access >= threshold {
            plan.close.push(tab.clone());
        }
    }

    let open_ids: HashSet<i32> = tabs.iter().map(|t| t.id).collect();
    plan.stale = timestamps
        .keys()
        .filter(|id| !open_ids.contains(id))
        .copied()
        .collect();
    plan.stale.sort_unstable();

    plan
}

/// Result of trying to close one planned tab
#[derive(Debug, Clone, PartialEq)]
pub struct CloseOutcome {
    pub tab_id: i32,
    pub removed: bool,
}

/// Storage writes that follow a sweep
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SweepRecords {
    /// Timestamps to set
    pub write: TabTimestamps,
    /// Tab ids whose records are deleted
    pub forget: Vec<i32>,
    pub closed: usize,
}

/// Turn a plan and the per-tab close results into storage updates
///
/// Every outcome is counted independently, so one failed removal never
/// hides the others. Tabs that were removed and stale ids are forgotten;
/// first-seen tabs are stamped with `now`. A tab whose removal failed
/// keeps its record and is retried on the next sweep.
pub fn settle_sweep(plan: &SweepPlan, outcomes: &[CloseOutcome], now: f64) -> SweepRecords {
    let removed: Vec<i32> = outcomes
        .iter()
        .filter(|outcome| outcome.removed)
        .map(|outcome| outcome.tab_id)
        .collect();

    let mut forget: Vec<i32> = plan.stale.iter().chain(removed.iter()).copied().collect();
    forget.sort_unstable();
    forget.dedup();

    SweepRecords {
        write: plan.first_seen.iter().map(|id| (*id, now)).collect(),
        forget,
        closed: removed.len(),
    }
}

/// Notification shown for each tab a sweep closes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedNotice {
    pub title: String,
    pub message: String,
}

pub fn closed_notice(tab: &TabInfo, threshold_ms: f64) -> ClosedNotice {
    ClosedNotice {
        title: "Closed inactive tab".to_string(),
        message: format!("{} (inactive for {})", tab.label(), format_duration(threshold_ms)),
    }
}

/// Human-readable duration for notices and debug output
pub fn format_duration(ms: f64) -> String {
    let total_minutes = (ms / 60_000.0).floor() as u64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    match (hours, minutes) {
        (0, 0) => format!("{} seconds", (ms / 1000.0).floor() as u64),
        (0, m) => format!("{} min", m),
        (h, 0) => format!("{} h", h),
        (h, m) => format!("{} h {} min", h, m),
    }
}
