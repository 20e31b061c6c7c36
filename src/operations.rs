/// Manual close operations offered by the popup

use crate::tab_data::TabInfo;

/// The active tab of the current window, if any
pub fn current_tab_id(tabs: &[TabInfo]) -> Option<i32> {
    tabs.iter().find(|tab| tab.active).map(|tab| tab.id)
}

/// Every tab in the window except the active one
pub fn other_tab_ids(tabs: &[TabInfo]) -> Vec<i32> {
    tabs.iter()
        .filter(|tab| !tab.active)
        .map(|tab| tab.id)
        .collect()
}

pub fn all_tab_ids(tabs: &[TabInfo]) -> Vec<i32> {
    tabs.iter().map(|tab| tab.id).collect()
}
