/// Reusable UI components

use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ToggleRowProps {
    pub id: AttrValue,
    pub label: AttrValue,
    pub checked: bool,
    pub on_toggle: Callback<bool>,
    #[prop_or(false)]
    pub disabled: bool,
    #[prop_or_default]
    pub hint: Option<AttrValue>,
}

/// Checkbox with a label, emitting the new checked state
#[function_component(ToggleRow)]
pub fn toggle_row(props: &ToggleRowProps) -> Html {
    let onchange = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                on_toggle.emit(input.checked());
            }
        })
    };

    html! {
        <div class="setting-row">
            <label for={props.id.clone()} class="setting-label">
                <input
                    type="checkbox"
                    id={props.id.clone()}
                    checked={props.checked}
                    disabled={props.disabled}
                    {onchange}
                />
                {" "}{props.label.clone()}
            </label>
            if let Some(hint) = &props.hint {
                <p class="setting-hint">{hint.clone()}</p>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct WhitelistEntryProps {
    pub domain: AttrValue,
    pub on_delete: Callback<String>,
    #[prop_or(false)]
    pub disabled: bool,
}

#[function_component(WhitelistEntry)]
pub fn whitelist_entry(props: &WhitelistEntryProps) -> Html {
    let onclick = {
        let on_delete = props.on_delete.clone();
        let domain = props.domain.to_string();
        Callback::from(move |_: MouseEvent| on_delete.emit(domain.clone()))
    };

    html! {
        <div class="whitelist-item">
            <span class="whitelist-domain">{props.domain.clone()}</span>
            <button
                class="whitelist-delete"
                title="Remove from whitelist"
                disabled={props.disabled}
                {onclick}
            >
                {"✕"}
            </button>
        </div>
    }
}
