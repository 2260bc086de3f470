//! WebAssembly bindings for Bitcoin address derivation.
//!
//! This crate provides JavaScript-accessible APIs for:
//! - Deriving P2PKH, P2SH-P2WPKH, P2WPKH and P2TR addresses from a public key
//! - Step-by-step derivation reports
//! - Parsing addresses back to their locking scripts
//! - Generating throwaway key pairs for demos

use wasm_bindgen::prelude::*;

pub mod error;
pub mod generator;
pub mod keys;
pub mod report;
pub mod view;

// Re-export main types for JS access
pub use error::BindingError;
pub use generator::{console_log, AddressGenerator};
pub use keys::generate_demo_key;

/// Initialize the WASM module with better panic messages.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
