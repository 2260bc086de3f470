//! Serializable views of derivation and parsing results for JavaScript.

use address_core::{AddressSet, DerivationDetails, DerivedAddress, PublicKey, ValidatedAddress};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::error::BindingError;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| BindingError::Serialization(format!("{:?}", e)).into())
}

/// One derived address with its intermediate values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressView {
    /// Address format name, e.g. "P2SH-P2WPKH".
    pub kind: String,
    /// Common name, e.g. "Nested SegWit".
    pub label: String,
    /// Network name.
    pub network: String,
    /// The printable address.
    pub address: String,
    /// scriptPubKey hex.
    pub script_pubkey: String,
    /// scriptPubKey disassembly.
    pub script_asm: String,
    /// HASH160 of the public key (P2PKH, P2SH-P2WPKH, P2WPKH).
    pub pubkey_hash: Option<String>,
    /// Redeem script hex (P2SH-P2WPKH).
    pub redeem_script: Option<String>,
    /// HASH160 of the redeem script (P2SH-P2WPKH).
    pub script_hash: Option<String>,
    /// Witness version (P2WPKH, P2TR).
    pub witness_version: Option<u8>,
    /// Witness program hex (P2WPKH, P2TR).
    pub witness_program: Option<String>,
    /// Taproot internal key.
    pub internal_key: Option<String>,
    /// TapTweak hash.
    pub tweak: Option<String>,
    /// Taproot output key.
    pub output_key: Option<String>,
    /// Output key y-parity (0 even, 1 odd).
    pub output_key_parity: Option<u8>,
}

impl From<&DerivedAddress> for AddressView {
    fn from(derived: &DerivedAddress) -> Self {
        let mut view = AddressView {
            kind: derived.kind.name().to_string(),
            label: derived.kind.label().to_string(),
            network: derived.network.name().to_string(),
            address: derived.address.clone(),
            script_pubkey: derived.script_pubkey.to_hex(),
            script_asm: derived.script_pubkey.asm(),
            pubkey_hash: None,
            redeem_script: None,
            script_hash: None,
            witness_version: None,
            witness_program: None,
            internal_key: None,
            tweak: None,
            output_key: None,
            output_key_parity: None,
        };

        match &derived.details {
            DerivationDetails::P2PKH { pubkey_hash } => {
                view.pubkey_hash = Some(hex::encode(pubkey_hash));
            }
            DerivationDetails::P2SHP2WPKH { redeem_script, script_hash } => {
                view.pubkey_hash = Some(hex::encode(&redeem_script.as_bytes()[2..]));
                view.redeem_script = Some(redeem_script.to_hex());
                view.script_hash = Some(hex::encode(script_hash));
            }
            DerivationDetails::P2WPKH { program } => {
                view.pubkey_hash = Some(hex::encode(program.program()));
                view.witness_version = Some(program.version());
                view.witness_program = Some(hex::encode(program.program()));
            }
            DerivationDetails::P2TR { tweaked } => {
                view.witness_version = Some(1);
                view.witness_program = Some(tweaked.output_key.to_hex());
                view.internal_key = Some(tweaked.internal_key.to_hex());
                view.tweak = Some(hex::encode(tweaked.tweak));
                view.output_key = Some(tweaked.output_key.to_hex());
                view.output_key_parity = Some(tweaked.parity.to_u8());
            }
        }

        view
    }
}

impl AddressView {
    /// Convert to JS value.
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        to_js(self)
    }
}

/// Every address derivable from one public key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressSummaryView {
    /// The public key hex.
    pub public_key: String,
    /// Whether the key is compressed.
    pub compressed: bool,
    /// Network name.
    pub network: String,
    /// Derived addresses, in format order.
    pub addresses: Vec<AddressView>,
    /// Formats skipped because the key is uncompressed.
    pub unavailable: Vec<String>,
}

impl AddressSummaryView {
    pub fn new(key: &PublicKey, set: &AddressSet) -> Self {
        let unavailable = address_core::AddressKind::ALL
            .iter()
            .filter(|kind| set.get(**kind).is_none())
            .map(|kind| kind.name().to_string())
            .collect();

        AddressSummaryView {
            public_key: key.to_hex(),
            compressed: key.is_compressed(),
            network: set.network.name().to_string(),
            addresses: set.iter().map(AddressView::from).collect(),
            unavailable,
        }
    }

    /// Convert to JS value.
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        to_js(self)
    }
}

/// A parsed address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedAddressView {
    pub address: String,
    /// Output type, e.g. "P2WSH".
    pub kind: String,
    pub network: String,
    pub script_pubkey: String,
    pub script_asm: String,
    pub witness_version: Option<u8>,
    pub witness_program: Option<String>,
}

impl From<&ValidatedAddress> for ParsedAddressView {
    fn from(parsed: &ValidatedAddress) -> Self {
        let program = parsed.script_pubkey.witness_program();

        ParsedAddressView {
            address: parsed.display.clone(),
            kind: parsed.kind.name().to_string(),
            network: parsed.network.name().to_string(),
            script_pubkey: parsed.script_pubkey.to_hex(),
            script_asm: parsed.script_pubkey.asm(),
            witness_version: program.as_ref().map(|p| p.version()),
            witness_program: program.as_ref().map(|p| hex::encode(p.program())),
        }
    }
}

impl ParsedAddressView {
    /// Convert to JS value.
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        to_js(self)
    }
}
