/// Whitelist editor: add, delete, export and import domains

use wasm_bindgen::prelude::*;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;
use patternfly_yew::prelude::*;

use crate::ui::components::WhitelistEntry;
use crate::whitelist::{add_domain, export_json, import_json, normalize_domain, remove_domain};

#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    fn exportToFile(data: &str, filename: &str);
}

const EXPORT_FILENAME: &str = "idle-tab-closer-whitelist.json";

#[derive(Properties, PartialEq)]
pub struct WhitelistPanelProps {
    pub whitelist: Vec<String>,
    /// Receives the complete new list; the parent persists it
    pub on_change: Callback<Vec<String>>,
    #[prop_or(false)]
    pub disabled: bool,
}

#[function_component(WhitelistPanel)]
pub fn whitelist_panel(props: &WhitelistPanelProps) -> Html {
    let input_value = use_state(String::new);
    let import_text = use_state(String::new);
    let feedback = use_state(|| None::<(AlertType, String)>);

    let on_input = {
        let input_value = input_value.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                input_value.set(input.value());
            }
        })
    };

    let add = {
        let input_value = input_value.clone();
        let feedback = feedback.clone();
        let whitelist = props.whitelist.clone();
        let on_change = props.on_change.clone();

        Callback::from(move |_: ()| {
            if input_value.trim().is_empty() {
                return;
            }

            match normalize_domain(&input_value) {
                Ok(domain) => {
                    let mut updated = whitelist.clone();
                    if add_domain(&mut updated, domain.clone()) {
                        on_change.emit(updated);
                        feedback.set(None);
                    } else {
                        feedback.set(Some((AlertType::Info, format!("{} is already whitelisted", domain))));
                    }
                    input_value.set(String::new());
                }
                Err(e) => {
                    feedback.set(Some((AlertType::Warning, e.to_string())));
                }
            }
        })
    };

    let on_add_click = {
        let add = add.clone();
        Callback::from(move |_| add.emit(()))
    };

    let on_keypress = {
        let add = add.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                add.emit(());
            }
        })
    };

    let on_delete = {
        let whitelist = props.whitelist.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |domain: String| {
            let mut updated = whitelist.clone();
            if remove_domain(&mut updated, &domain) {
                on_change.emit(updated);
            }
        })
    };

    let on_export = {
        let whitelist = props.whitelist.clone();
        let feedback = feedback.clone();
        Callback::from(move |_| match export_json(&whitelist) {
            Ok(json) => exportToFile(&json, EXPORT_FILENAME),
            Err(e) => {
                log::error!("Whitelist export failed: {}", e);
                feedback.set(Some((AlertType::Danger, e.to_string())));
            }
        })
    };

    let on_import_input = {
        let import_text = import_text.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
                import_text.set(area.value());
            }
        })
    };

    let on_import = {
        let import_text = import_text.clone();
        let feedback = feedback.clone();
        let whitelist = props.whitelist.clone();
        let on_change = props.on_change.clone();

        Callback::from(move |_| {
            let mut updated = whitelist.clone();
            match import_json(&mut updated, &import_text) {
                Ok(summary) => {
                    if summary.added > 0 {
                        on_change.emit(updated);
                    }
                    let mut message = format!(
                        "Imported {} domain(s), {} already present",
                        summary.added, summary.duplicates
                    );
                    if !summary.invalid.is_empty() {
                        message.push_str(&format!("; skipped invalid: {}", summary.invalid.join(", ")));
                    }
                    let kind = if summary.invalid.is_empty() {
                        AlertType::Success
                    } else {
                        AlertType::Warning
                    };
                    feedback.set(Some((kind, message)));
                    import_text.set(String::new());
                }
                Err(e) => feedback.set(Some((AlertType::Danger, e.to_string()))),
            }
        })
    };

    html! {
        <div class="whitelist-section">
            <h2 class="section-title">{"Whitelist"}</h2>

            <div class="whitelist-input-row">
                <input
                    type="text"
                    class="whitelist-input"
                    placeholder="example.com"
                    value={(*input_value).clone()}
                    disabled={props.disabled}
                    oninput={on_input}
                    onkeypress={on_keypress}
                />
                <Button onclick={on_add_click} disabled={props.disabled} variant={ButtonVariant::Secondary}>
                    {"Add"}
                </Button>
            </div>

            if let Some((kind, message)) = (*feedback).clone() {
                <Alert r#type={kind} title={message} inline={true}>
                </Alert>
            }

            <div class="whitelist-container">
                if props.whitelist.is_empty() {
                    <p class="whitelist-empty">{"No whitelisted domains"}</p>
                }
                {for props.whitelist.iter().map(|domain| html! {
                    <WhitelistEntry
                        key={domain.clone()}
                        domain={domain.clone()}
                        on_delete={on_delete.clone()}
                        disabled={props.disabled}
                    />
                })}
            </div>

            <div class="flex-column-gap">
                <Button onclick={on_export} disabled={props.disabled} variant={ButtonVariant::Secondary} block={true}>
                    {"Export Whitelist"}
                </Button>
                <textarea
                    class="whitelist-import"
                    placeholder={r#"["example.com", "github.com"]"#}
                    value={(*import_text).clone()}
                    disabled={props.disabled}
                    oninput={on_import_input}
                />
                <Button onclick={on_import} disabled={props.disabled || import_text.trim().is_empty()} variant={ButtonVariant::Secondary} block={true}>
                    {"Import Whitelist"}
                </Button>
            </div>
        </div>
    }
}
