//! Errors surfaced to JavaScript.

use address_core::AddressError;
use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("Invalid network: {0}")]
    UnknownNetwork(String),

    #[error("Invalid address type: {0}")]
    UnknownKind(String),

    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Entropy unavailable: {0}")]
    Entropy(String),
}

impl From<BindingError> for JsValue {
    fn from(e: BindingError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
