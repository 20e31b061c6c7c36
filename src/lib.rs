/// Idle Tab Closer - Chrome Extension that closes tabs left inactive too long
/// Built with Rust + WASM + Yew

pub mod activity;
pub mod background;
pub mod checker;
pub mod domain;
pub mod error;
pub mod messages;
pub mod monitor;
pub mod operations;
pub mod settings;
pub mod storage;
pub mod tab_data;
pub mod ui;
pub mod whitelist;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
