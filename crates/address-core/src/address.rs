//! Address derivation from public keys, and parsing of address strings.
//!
//! Supports:
//! - P2PKH (Legacy) - addresses starting with 1 (mainnet) or m/n (testnet)
//! - P2SH-P2WPKH (Nested SegWit) - addresses starting with 3 (mainnet) or 2 (testnet)
//! - P2WPKH (Native SegWit v0) - bc1q.../tb1q...
//! - P2TR (Taproot, SegWit v1) - bc1p.../tb1p...

use alloc::string::{String, ToString};
use crate::base58;
use crate::bech32::{self, WitnessProgram};
use crate::curve::{CurveOps, Secp256k1};
use crate::error::AddressError;
use crate::hash::hash160;
use crate::key::{PublicKey, XOnlyPublicKey};
use crate::network::Network;
use crate::script::{ScriptKind, ScriptPubKey};
use crate::taproot::{TaprootTweaker, TweakedPublicKey};

/// The four address formats derivable from a single public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// Legacy P2PKH, Base58Check
    P2PKH,
    /// P2WPKH wrapped in P2SH, Base58Check
    P2SHP2WPKH,
    /// Native SegWit v0, Bech32
    P2WPKH,
    /// Taproot key path, Bech32m
    P2TR,
}

impl AddressKind {
    pub const ALL: [AddressKind; 4] = [
        AddressKind::P2PKH,
        AddressKind::P2SHP2WPKH,
        AddressKind::P2WPKH,
        AddressKind::P2TR,
    ];

    /// Get the display name for this address kind.
    pub fn name(&self) -> &'static str {
        match self {
            AddressKind::P2PKH => "P2PKH",
            AddressKind::P2SHP2WPKH => "P2SH-P2WPKH",
            AddressKind::P2WPKH => "P2WPKH",
            AddressKind::P2TR => "P2TR",
        }
    }

    /// Common name of the format.
    pub fn label(&self) -> &'static str {
        match self {
            AddressKind::P2PKH => "Legacy",
            AddressKind::P2SHP2WPKH => "Nested SegWit",
            AddressKind::P2WPKH => "Native SegWit",
            AddressKind::P2TR => "Taproot",
        }
    }

    /// Parse from a name such as `"p2tr"`, `"p2sh-p2wpkh"` or `"taproot"`.
    pub fn from_name(s: &str) -> Option<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "p2pkh" | "legacy" => Some(AddressKind::P2PKH),
            "p2sh-p2wpkh" | "p2sh_p2wpkh" | "nested" | "nested-segwit" => Some(AddressKind::P2SHP2WPKH),
            "p2wpkh" | "segwit" | "native-segwit" => Some(AddressKind::P2WPKH),
            "p2tr" | "taproot" => Some(AddressKind::P2TR),
            _ => None,
        }
    }

    /// Whether the format needs a compressed key.
    pub fn requires_compressed_key(&self) -> bool {
        matches!(self, AddressKind::P2SHP2WPKH | AddressKind::P2WPKH)
    }
}

impl core::fmt::Display for AddressKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Intermediate values of a derivation's hash chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivationDetails {
    P2PKH {
        pubkey_hash: [u8; 20],
    },
    P2SHP2WPKH {
        /// The P2WPKH scriptPubKey used as redeem script.
        redeem_script: ScriptPubKey,
        script_hash: [u8; 20],
    },
    P2WPKH {
        program: WitnessProgram,
    },
    P2TR {
        tweaked: TweakedPublicKey,
    },
}

/// An address derived from a public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAddress {
    /// The address format.
    pub kind: AddressKind,
    /// The network the address is encoded for.
    pub network: Network,
    /// The printable address.
    pub address: String,
    /// The locking script the address stands for.
    pub script_pubkey: ScriptPubKey,
    /// Hash chain intermediates.
    pub details: DerivationDetails,
}

/// Addresses of every format for one key.
///
/// SegWit entries are `None` when the key is uncompressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSet {
    pub network: Network,
    pub p2pkh: DerivedAddress,
    pub p2sh_p2wpkh: Option<DerivedAddress>,
    pub p2wpkh: Option<DerivedAddress>,
    pub p2tr: DerivedAddress,
}

impl AddressSet {
    /// Iterate over the derived addresses in format order.
    pub fn iter(&self) -> impl Iterator<Item = &DerivedAddress> {
        [Some(&self.p2pkh), self.p2sh_p2wpkh.as_ref(), self.p2wpkh.as_ref(), Some(&self.p2tr)]
            .into_iter()
            .flatten()
    }

    pub fn get(&self, kind: AddressKind) -> Option<&DerivedAddress> {
        match kind {
            AddressKind::P2PKH => Some(&self.p2pkh),
            AddressKind::P2SHP2WPKH => self.p2sh_p2wpkh.as_ref(),
            AddressKind::P2WPKH => self.p2wpkh.as_ref(),
            AddressKind::P2TR => Some(&self.p2tr),
        }
    }
}

/// Derives addresses from public keys.
///
/// The curve backend is only used for Taproot tweaking and key validation;
/// the hash-based formats need no curve arithmetic.
#[derive(Debug, Clone, Default)]
pub struct AddressDeriver<C = Secp256k1> {
    tweaker: TaprootTweaker<C>,
}

impl AddressDeriver<Secp256k1> {
    /// A deriver backed by the `k256` secp256k1 implementation.
    pub fn secp256k1() -> Self {
        Self::new(Secp256k1)
    }
}

impl<C: CurveOps> AddressDeriver<C> {
    pub fn new(curve: C) -> Self {
        AddressDeriver { tweaker: TaprootTweaker::new(curve) }
    }

    /// Parse a SEC1 key and check that it lies on the curve.
    pub fn parse_public_key(&self, bytes: &[u8]) -> Result<PublicKey, AddressError> {
        PublicKey::from_slice_checked(bytes, self.tweaker.curve())
    }

    /// Derive an address of the given kind.
    pub fn derive(&self, kind: AddressKind, key: &PublicKey, network: Network) -> Result<DerivedAddress, AddressError> {
        match kind {
            AddressKind::P2PKH => Ok(self.derive_p2pkh(key, network)),
            AddressKind::P2SHP2WPKH => self.derive_p2sh_p2wpkh(key, network),
            AddressKind::P2WPKH => self.derive_p2wpkh(key, network),
            AddressKind::P2TR => self.derive_p2tr(key, network),
        }
    }

    /// Derive all four formats.
    ///
    /// Fails only if the Taproot tweak fails; an uncompressed key leaves the
    /// SegWit v0 entries empty instead.
    pub fn derive_all(&self, key: &PublicKey, network: Network) -> Result<AddressSet, AddressError> {
        let segwit = |result: Result<DerivedAddress, AddressError>| match result {
            Ok(derived) => Ok(Some(derived)),
            Err(AddressError::UncompressedKeyNotSupported) => Ok(None),
            Err(e) => Err(e),
        };

        Ok(AddressSet {
            network,
            p2pkh: self.derive_p2pkh(key, network),
            p2sh_p2wpkh: segwit(self.derive_p2sh_p2wpkh(key, network))?,
            p2wpkh: segwit(self.derive_p2wpkh(key, network))?,
            p2tr: self.derive_p2tr(key, network)?,
        })
    }

    /// Legacy P2PKH: Base58Check(p2pkh_version || HASH160(pubkey)).
    pub fn derive_p2pkh(&self, key: &PublicKey, network: Network) -> DerivedAddress {
        let pubkey_hash = hash160(key.as_bytes());

        DerivedAddress {
            kind: AddressKind::P2PKH,
            network,
            address: base58::encode_check(network.p2pkh_version(), &pubkey_hash),
            script_pubkey: ScriptPubKey::p2pkh(&pubkey_hash),
            details: DerivationDetails::P2PKH { pubkey_hash },
        }
    }

    /// Nested SegWit: the P2WPKH script as redeem script, committed to by P2SH.
    pub fn derive_p2sh_p2wpkh(&self, key: &PublicKey, network: Network) -> Result<DerivedAddress, AddressError> {
        let pubkey_hash = compressed_key_hash(key)?;
        let redeem_script = ScriptPubKey::p2wpkh(&pubkey_hash);
        let script_hash = hash160(redeem_script.as_bytes());

        Ok(DerivedAddress {
            kind: AddressKind::P2SHP2WPKH,
            network,
            address: base58::encode_check(network.p2sh_version(), &script_hash),
            script_pubkey: ScriptPubKey::p2sh(&script_hash),
            details: DerivationDetails::P2SHP2WPKH { redeem_script, script_hash },
        })
    }

    /// Native SegWit v0: witness program HASH160(pubkey), Bech32.
    pub fn derive_p2wpkh(&self, key: &PublicKey, network: Network) -> Result<DerivedAddress, AddressError> {
        let pubkey_hash = compressed_key_hash(key)?;
        let program = WitnessProgram::new(0, pubkey_hash.to_vec())?;

        Ok(DerivedAddress {
            kind: AddressKind::P2WPKH,
            network,
            address: bech32::encode_witness(network.bech32_hrp(), &program)?,
            script_pubkey: ScriptPubKey::p2wpkh(&pubkey_hash),
            details: DerivationDetails::P2WPKH { program },
        })
    }

    /// Taproot: witness v1 program of the tweaked x-only key, Bech32m.
    ///
    /// Uncompressed keys are reduced to their x-coordinate before tweaking;
    /// `lift_x` fixes the even-y representative either way.
    pub fn derive_p2tr(&self, key: &PublicKey, network: Network) -> Result<DerivedAddress, AddressError> {
        self.derive_p2tr_x_only(&key.x_only(), network)
    }

    /// Taproot from an already-extracted x-only internal key.
    pub fn derive_p2tr_x_only(&self, internal_key: &XOnlyPublicKey, network: Network) -> Result<DerivedAddress, AddressError> {
        let tweaked = self.tweaker.tweak(internal_key)?;
        let output_key = tweaked.output_key.as_bytes();
        let program = WitnessProgram::new(1, output_key.to_vec())?;

        Ok(DerivedAddress {
            kind: AddressKind::P2TR,
            network,
            address: bech32::encode_witness(network.bech32_hrp(), &program)?,
            script_pubkey: ScriptPubKey::p2tr(output_key),
            details: DerivationDetails::P2TR { tweaked },
        })
    }
}

fn compressed_key_hash(key: &PublicKey) -> Result<[u8; 20], AddressError> {
    match key {
        PublicKey::Compressed(bytes) => Ok(hash160(bytes)),
        PublicKey::Uncompressed(_) => Err(AddressError::UncompressedKeyNotSupported),
    }
}

/// A parsed Bitcoin address with its scriptPubKey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAddress {
    /// The output type the address pays to.
    pub kind: ScriptKind,
    /// The network this address belongs to.
    pub network: Network,
    /// The scriptPubKey for this address (used in transaction outputs).
    pub script_pubkey: ScriptPubKey,
    /// The original address string.
    pub display: String,
}

/// Parse a Bitcoin address, requiring it to belong to `expected_network`.
pub fn parse_address(address: &str, expected_network: Network) -> Result<ValidatedAddress, AddressError> {
    let trimmed = address.trim();

    // Bech32/Bech32m first (bc1.../tb1.../bcrt1...)
    let lower = trimmed.to_ascii_lowercase();
    if ["bc1", "tb1", "bcrt1"].iter().any(|prefix| lower.starts_with(prefix)) {
        return parse_segwit_address(trimmed, expected_network);
    }

    // Base58Check (1.../3.../m.../n.../2...)
    parse_base58_address(trimmed, expected_network)
}

fn parse_base58_address(address: &str, expected_network: Network) -> Result<ValidatedAddress, AddressError> {
    let (version, payload) = base58::decode_check(address)?;

    let hash: [u8; 20] = payload.as_slice().try_into().map_err(|_| AddressError::InvalidFormat)?;

    let kind = if version == expected_network.p2pkh_version() {
        ScriptKind::P2PKH
    } else if version == expected_network.p2sh_version() {
        ScriptKind::P2SH
    } else {
        return Err(match base58_network(version) {
            Some(network) => AddressError::NetworkMismatch {
                expected: expected_network.name().into(),
                got: network.name().into(),
            },
            None => AddressError::UnsupportedType,
        });
    };

    let script_pubkey = match kind {
        ScriptKind::P2PKH => ScriptPubKey::p2pkh(&hash),
        _ => ScriptPubKey::p2sh(&hash),
    };

    Ok(ValidatedAddress {
        kind,
        network: expected_network,
        script_pubkey,
        display: address.to_string(),
    })
}

/// The network a Base58 version byte belongs to; testnet stands in for all test networks.
fn base58_network(version: u8) -> Option<Network> {
    match version {
        0x00 | 0x05 => Some(Network::Mainnet),
        0x6f | 0xc4 => Some(Network::Testnet),
        _ => None,
    }
}

fn parse_segwit_address(address: &str, expected_network: Network) -> Result<ValidatedAddress, AddressError> {
    let (hrp, program) = bech32::decode_witness(address)?;

    if hrp != expected_network.bech32_hrp() {
        return Err(AddressError::NetworkMismatch {
            expected: expected_network.name().into(),
            got: hrp,
        });
    }

    let script_pubkey = ScriptPubKey::from_witness_program(&program);

    Ok(ValidatedAddress {
        kind: script_pubkey.kind(),
        network: expected_network,
        script_pubkey,
        display: address.to_string(),
    })
}
