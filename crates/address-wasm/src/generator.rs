//! Address generator exposed to JavaScript.

use address_core::{AddressDeriver, AddressKind, Network, PublicKey};
use wasm_bindgen::prelude::*;

use crate::error::BindingError;
use crate::report;
use crate::view::{AddressSummaryView, AddressView, ParsedAddressView};

/// Derives and parses addresses for one network.
#[wasm_bindgen]
pub struct AddressGenerator {
    /// The network addresses are encoded for.
    network: Network,
    deriver: AddressDeriver,
}

impl AddressGenerator {
    /// Create a generator for a network name such as `"mainnet"` or `"regtest"`.
    pub fn for_network(network: &str) -> Result<Self, BindingError> {
        let network = Network::from_name(network)
            .ok_or_else(|| BindingError::UnknownNetwork(network.to_string()))?;

        Ok(AddressGenerator {
            network,
            deriver: AddressDeriver::secp256k1(),
        })
    }

    fn parse_key(&self, pubkey_hex: &str) -> Result<PublicKey, BindingError> {
        let bytes = hex::decode(pubkey_hex.trim())?;
        Ok(self.deriver.parse_public_key(&bytes)?)
    }

    /// All addresses for a key.
    pub fn summary(&self, pubkey_hex: &str) -> Result<AddressSummaryView, BindingError> {
        let key = self.parse_key(pubkey_hex)?;
        let set = self.deriver.derive_all(&key, self.network)?;
        Ok(AddressSummaryView::new(&key, &set))
    }

    /// One address for a key.
    pub fn single(&self, kind: &str, pubkey_hex: &str) -> Result<AddressView, BindingError> {
        let kind = AddressKind::from_name(kind)
            .ok_or_else(|| BindingError::UnknownKind(kind.to_string()))?;
        let key = self.parse_key(pubkey_hex)?;
        let derived = self.deriver.derive(kind, &key, self.network)?;
        Ok(AddressView::from(&derived))
    }

    /// The textual derivation breakdown for a key.
    pub fn render_report(&self, pubkey_hex: &str) -> Result<String, BindingError> {
        let key = self.parse_key(pubkey_hex)?;
        let set = self.deriver.derive_all(&key, self.network)?;
        Ok(report::render(&key, &set))
    }

    /// Parse an address belonging to this generator's network.
    pub fn parse(&self, address: &str) -> Result<ParsedAddressView, BindingError> {
        let parsed = address_core::parse_address(address, self.network)?;
        Ok(ParsedAddressView::from(&parsed))
    }
}

#[wasm_bindgen]
impl AddressGenerator {
    /// Create a new generator.
    ///
    /// # Arguments
    /// * `network` - "mainnet", "testnet", "signet" or "regtest"
    #[wasm_bindgen(constructor)]
    pub fn new(network: &str) -> Result<AddressGenerator, JsValue> {
        Ok(Self::for_network(network)?)
    }

    /// Get the network name.
    #[wasm_bindgen(getter)]
    pub fn network(&self) -> String {
        self.network.name().to_string()
    }

    /// Derive every address format for a hex public key.
    ///
    /// SegWit formats are listed under `unavailable` for uncompressed keys.
    #[wasm_bindgen]
    pub fn derive_all(&self, pubkey_hex: &str) -> Result<JsValue, JsValue> {
        self.summary(pubkey_hex)?.to_js()
    }

    /// Derive one address format ("p2pkh", "p2sh-p2wpkh", "p2wpkh", "p2tr").
    #[wasm_bindgen]
    pub fn derive(&self, kind: &str, pubkey_hex: &str) -> Result<JsValue, JsValue> {
        self.single(kind, pubkey_hex)?.to_js()
    }

    /// Step-by-step derivation breakdown as text.
    #[wasm_bindgen]
    pub fn report(&self, pubkey_hex: &str) -> Result<String, JsValue> {
        Ok(self.render_report(pubkey_hex)?)
    }

    /// Write the derivation breakdown to the browser console.
    #[wasm_bindgen]
    pub fn log_report(&self, pubkey_hex: &str) -> Result<(), JsValue> {
        let report = self.render_report(pubkey_hex)?;
        for line in report.lines() {
            console_log(line);
        }
        Ok(())
    }

    /// Parse and classify an address for this network.
    #[wasm_bindgen]
    pub fn parse_address(&self, address: &str) -> Result<JsValue, JsValue> {
        self.parse(address)?.to_js()
    }
}

/// Log a message to the browser console.
#[wasm_bindgen]
pub fn console_log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}
