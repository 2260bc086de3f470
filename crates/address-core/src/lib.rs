//! Bitcoin address derivation from secp256k1 public keys.
//!
//! This crate provides pure Rust implementations of:
//! - Legacy P2PKH and nested SegWit P2SH-P2WPKH addresses (Base58Check)
//! - Native SegWit P2WPKH addresses (Bech32)
//! - Taproot P2TR key-path addresses with the BIP341 tweak (Bech32m)
//! - Address parsing back to a scriptPubKey

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod address;
pub mod base58;
pub mod bech32;
pub mod curve;
pub mod error;
pub mod hash;
pub mod key;
pub mod network;
pub mod script;
pub mod taproot;

pub use address::{parse_address, AddressDeriver, AddressKind, AddressSet, DerivationDetails, DerivedAddress, ValidatedAddress};
pub use bech32::WitnessProgram;
pub use curve::{CurveOps, Parity, Secp256k1};
pub use error::AddressError;
pub use key::{PublicKey, XOnlyPublicKey};
pub use network::Network;
pub use script::{ScriptKind, ScriptPubKey};
pub use taproot::{TaprootTweaker, TweakedPublicKey};
