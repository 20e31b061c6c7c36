/// Popup UI for the Idle Tab Closer extension

use yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, console};
use patternfly_yew::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::background::apply_alarm;
use crate::error::ExtensionError;
use crate::messages::{ActionResponse, Request};
use crate::operations::{all_tab_ids, current_tab_id, other_tab_ids};
use crate::settings::{
    DEFAULT_THRESHOLD_HOURS, KEY_AUTO_CLOSE, KEY_TEST_MODE, KEY_THRESHOLD, KEY_WHITELIST,
    SETTINGS_KEYS, Settings, hours_from_input, hours_to_ms,
};
use crate::storage::settings_from_map;
use crate::tab_data::TabInfo;
use crate::ui::components::ToggleRow;
use crate::ui::whitelist_panel::WhitelistPanel;

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getCurrentWindowTabs() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeTabs(tab_ids: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(items: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendMessage(message: JsValue) -> Result<JsValue, JsValue>;
}

#[derive(Clone, PartialEq)]
enum PopupState {
    Loading,
    Idle,
    Busy(String),
    Notice(String),
    Error(String),
}

#[derive(Clone, Copy, PartialEq)]
enum CloseScope {
    Current,
    Others,
    All,
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| PopupState::Loading);
    let settings = use_state(Settings::default);
    let hours_input = use_state(|| DEFAULT_THRESHOLD_HOURS.to_string());

    // Load settings on mount
    {
        let state = state.clone();
        let settings = settings.clone();
        let hours_input = hours_input.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match load_settings().await {
                    Ok(loaded) => {
                        hours_input.set(format!("{}", loaded.threshold_hours()));
                        settings.set(loaded);
                        state.set(PopupState::Idle);
                    }
                    Err(e) => {
                        state.set(PopupState::Error(format!("Failed to load settings: {}", e)));
                    }
                }
            });
            || ()
        });
    }

    let on_toggle_auto_close = {
        let settings = settings.clone();
        let state = state.clone();

        Callback::from(move |enabled: bool| {
            let updated = Settings {
                auto_close_enabled: enabled,
                ..(*settings).clone()
            };
            settings.set(updated.clone());

            let state = state.clone();
            spawn_local(async move {
                let result = async {
                    apply_alarm(&updated).await?;
                    save_setting(KEY_AUTO_CLOSE, json!(enabled)).await
                }
                .await;
                if let Err(e) = result {
                    log::error!("Failed to update auto close setting: {}", e);
                    state.set(PopupState::Error(e.to_string()));
                }
            });
        })
    };

    let on_toggle_test_mode = {
        let settings = settings.clone();
        let state = state.clone();

        Callback::from(move |test_mode: bool| {
            let updated = Settings {
                test_mode,
                ..(*settings).clone()
            };
            settings.set(updated.clone());

            let state = state.clone();
            spawn_local(async move {
                let result = async {
                    save_setting(KEY_TEST_MODE, json!(test_mode)).await?;
                    apply_alarm(&updated).await
                }
                .await;
                if let Err(e) = result {
                    log::error!("Failed to update test mode: {}", e);
                    state.set(PopupState::Error(e.to_string()));
                }
            });
        })
    };

    let on_hours_input = {
        let hours_input = hours_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                hours_input.set(input.value());
            }
        })
    };

    let on_hours_change = {
        let settings = settings.clone();
        let hours_input = hours_input.clone();
        let state = state.clone();

        Callback::from(move |_: Event| {
            let hours = hours_from_input(&hours_input);
            let threshold = hours_to_ms(hours);
            log::info!("Setting inactivity threshold: {} h ({} ms)", hours, threshold);

            hours_input.set(hours.to_string());
            settings.set(Settings {
                inactive_threshold_ms: threshold,
                ..(*settings).clone()
            });

            let state = state.clone();
            spawn_local(async move {
                if let Err(e) = save_setting(KEY_THRESHOLD, json!(threshold)).await {
                    log::error!("Failed to update threshold: {}", e);
                    state.set(PopupState::Error(e.to_string()));
                }
            });
        })
    };

    let on_whitelist_change = {
        let settings = settings.clone();
        let state = state.clone();

        Callback::from(move |whitelist: Vec<String>| {
            settings.set(Settings {
                whitelist: whitelist.clone(),
                ..(*settings).clone()
            });

            let state = state.clone();
            spawn_local(async move {
                if let Err(e) = save_setting(KEY_WHITELIST, json!(whitelist)).await {
                    log::error!("Failed to save whitelist: {}", e);
                    state.set(PopupState::Error(e.to_string()));
                }
            });
        })
    };

    let on_close = {
        let state = state.clone();
        move |scope: CloseScope| {
            let state = state.clone();
            Callback::from(move |_: MouseEvent| {
                let state = state.clone();
                spawn_local(async move {
                    if let Err(e) = close_tabs(scope).await {
                        state.set(PopupState::Error(format!("Failed to close tabs: {}", e)));
                    }
                });
            })
        }
    };

    let on_debug_info = {
        let state = state.clone();
        Callback::from(move |_| {
            let state = state.clone();
            spawn_local(async move {
                match send_request(&Request::GetDebugInfo).await {
                    Ok(info) => {
                        console::log_2(&"Debug Info:".into(), &info);
                        alert("Debug info was written to the console (press F12 to view)");
                    }
                    Err(e) => state.set(PopupState::Error(e.to_string())),
                }
            });
        })
    };

    let on_force_check = {
        let state = state.clone();
        Callback::from(move |_| {
            let state = state.clone();
            state.set(PopupState::Busy("Checking inactive tabs...".to_string()));
            spawn_local(async move {
                match force_check().await {
                    Ok(reply) => state.set(PopupState::Notice(reply.message)),
                    Err(e) => state.set(PopupState::Error(e.to_string())),
                }
            });
        })
    };

    let on_reset_times = {
        let state = state.clone();
        Callback::from(move |_| {
            if !confirm("This sets every inactive tab's last access to 24 hours ago. Continue?") {
                return;
            }

            let state = state.clone();
            state.set(PopupState::Busy("Resetting tab times...".to_string()));
            spawn_local(async move {
                let result = async {
                    let reset = send_action(&Request::ResetAllTabTimes { hours: 24.0 }).await?;
                    alert(&reset.message);
                    force_check().await
                }
                .await;
                match result {
                    Ok(reply) => state.set(PopupState::Notice(reply.message)),
                    Err(e) => state.set(PopupState::Error(e.to_string())),
                }
            });
        })
    };

    let is_busy = matches!(*state, PopupState::Loading | PopupState::Busy(_));

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Idle Tab Closer"}</h1>

            // Status display
            {match &*state {
                PopupState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                PopupState::Busy(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                PopupState::Notice(msg) => html! {
                    <Alert r#type={AlertType::Info} title={msg.clone()} inline={true}>
                    </Alert>
                },
                PopupState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                PopupState::Idle => html! {}
            }}

            <div class="flex-column-gap">
                <Button onclick={on_close(CloseScope::Current)} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Close Current Tab"}
                </Button>
                <Button onclick={on_close(CloseScope::Others)} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Close Other Tabs"}
                </Button>
                <Button onclick={on_close(CloseScope::All)} disabled={is_busy} variant={ButtonVariant::Danger} block={true}>
                    {"Close All Tabs"}
                </Button>
            </div>

            <div class="settings-section">
                <h2 class="section-title">{"Auto-close"}</h2>

                <ToggleRow
                    id="autoCloseInactive"
                    label="Close inactive tabs automatically"
                    checked={settings.auto_close_enabled}
                    on_toggle={on_toggle_auto_close}
                    disabled={is_busy}
                />

                <div class="setting-row">
                    <label for="inactiveThreshold" class="setting-label">{"Close after (hours)"}</label>
                    <input
                        type="number"
                        id="inactiveThreshold"
                        min="1"
                        value={(*hours_input).clone()}
                        disabled={is_busy}
                        oninput={on_hours_input}
                        onchange={on_hours_change}
                    />
                </div>

                <ToggleRow
                    id="testMode"
                    label="Test mode"
                    hint="Closes tabs after 1 minute and checks every 30 seconds"
                    checked={settings.test_mode}
                    on_toggle={on_toggle_test_mode}
                    disabled={is_busy}
                />

                <div class="flex-column-gap">
                    <Button onclick={on_debug_info} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                        {"Show Debug Info"}
                    </Button>
                    <Button onclick={on_force_check} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                        {"Check Inactive Tabs Now"}
                    </Button>
                    <Button onclick={on_reset_times} disabled={is_busy} variant={ButtonVariant::Danger} block={true}>
                        {"Reset All Tab Times"}
                    </Button>
                </div>
            </div>

            <WhitelistPanel
                whitelist={settings.whitelist.clone()}
                on_change={on_whitelist_change}
                disabled={is_busy}
            />

            <p class="footer-popup">
                {"Idle Tab Closer v0.1.0"}
            </p>
        </div>
    }
}

// Helper functions

async fn load_settings() -> Result<Settings, ExtensionError> {
    let stored_js = getStorage(to_js(&SETTINGS_KEYS)?)
        .await
        .map_err(|e| ExtensionError::bridge("storage.get", e))?;

    let stored: Map<String, Value> = if stored_js.is_null() || stored_js.is_undefined() {
        Map::new()
    } else {
        serde_wasm_bindgen::from_value(stored_js)?
    };

    let first_run = !stored.contains_key(KEY_THRESHOLD);
    let settings = settings_from_map(stored);

    // Persist the default so the background sees an explicit threshold
    if first_run {
        save_setting(KEY_THRESHOLD, json!(settings.inactive_threshold_ms)).await?;
    }

    Ok(settings)
}

async fn save_setting(key: &str, value: Value) -> Result<(), ExtensionError> {
    let mut items = Map::new();
    items.insert(key.to_string(), value);

    setStorage(to_js(&items)?)
        .await
        .map_err(|e| ExtensionError::bridge("storage.set", e))
}

async fn close_tabs(scope: CloseScope) -> Result<(), ExtensionError> {
    let tabs_js = getCurrentWindowTabs()
        .await
        .map_err(|e| ExtensionError::bridge("tabs.query", e))?;
    let tabs: Vec<TabInfo> = serde_wasm_bindgen::from_value(tabs_js)?;

    let tab_ids: Vec<i32> = match scope {
        CloseScope::Current => current_tab_id(&tabs).into_iter().collect(),
        CloseScope::Others => other_tab_ids(&tabs),
        CloseScope::All => all_tab_ids(&tabs),
    };

    removeTabs(to_js(&tab_ids)?)
        .await
        .map_err(|e| ExtensionError::bridge("tabs.remove", e))
}

async fn send_request(request: &Request) -> Result<JsValue, ExtensionError> {
    sendMessage(to_js(request)?)
        .await
        .map_err(|e| ExtensionError::bridge("runtime.sendMessage", e))
}

async fn send_action(request: &Request) -> Result<ActionResponse, ExtensionError> {
    let reply: ActionResponse = serde_wasm_bindgen::from_value(send_request(request).await?)?;
    if reply.success {
        Ok(reply)
    } else {
        Err(ExtensionError::Bridge {
            operation: "background request",
            message: reply.message,
        })
    }
}

async fn force_check() -> Result<ActionResponse, ExtensionError> {
    send_action(&Request::ForceCheck).await
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, ExtensionError> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}
