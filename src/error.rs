/// Error type shared by the background worker and the popup

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum ExtensionError {
    #[error("{operation} failed: {message}")]
    Bridge { operation: &'static str, message: String },

    #[error("Failed to convert value: {0}")]
    Conversion(#[from] serde_wasm_bindgen::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

impl ExtensionError {
    /// Wrap a rejected promise from one of the JS bridge functions
    pub fn bridge(operation: &'static str, err: JsValue) -> Self {
        let message = err
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&err, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{:?}", err));

        ExtensionError::Bridge { operation, message }
    }
}

impl From<ExtensionError> for JsValue {
    fn from(err: ExtensionError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExtensionError>;
