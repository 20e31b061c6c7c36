/// Popup UI modules
pub mod popup;
mod components;
mod whitelist_panel;
