//! Errors returned by key parsing, derivation and address parsing.

use alloc::string::String;
use crate::base58::Base58Error;
use crate::bech32::Bech32Error;

/// Address derivation and validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Public key has a bad length, prefix, or coordinate
    InvalidPublicKey(&'static str),
    /// SegWit v0 output requested for an uncompressed key
    UncompressedKeyNotSupported,
    /// Taproot internal key x-coordinate is not on the curve
    InvalidInternalKey,
    /// TapTweak hash is not below the curve order
    InvalidTweak,
    /// Tweaked output key is the point at infinity
    TweakFailure,
    /// Base58Check decoding failure
    Base58(Base58Error),
    /// Bech32/Bech32m decoding failure
    Bech32(Bech32Error),
    /// Decoded payload does not match any address layout
    InvalidFormat,
    /// Address network mismatch
    NetworkMismatch { expected: String, got: String },
    /// Unsupported address type
    UnsupportedType,
}

impl core::fmt::Display for AddressError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AddressError::InvalidPublicKey(reason) => write!(f, "Invalid public key: {}", reason),
            AddressError::UncompressedKeyNotSupported => {
                write!(f, "SegWit outputs require a compressed public key")
            }
            AddressError::InvalidInternalKey => write!(f, "Taproot internal key is not on the curve"),
            AddressError::InvalidTweak => write!(f, "Taproot tweak exceeds the curve order"),
            AddressError::TweakFailure => write!(f, "Taproot tweak produced the point at infinity"),
            AddressError::Base58(e) => write!(f, "{}", e),
            AddressError::Bech32(e) => write!(f, "{}", e),
            AddressError::InvalidFormat => write!(f, "Invalid address format"),
            AddressError::NetworkMismatch { expected, got } => {
                write!(f, "Address network mismatch: expected {}, got {}", expected, got)
            }
            AddressError::UnsupportedType => write!(f, "Unsupported address type"),
        }
    }
}

impl core::error::Error for AddressError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            AddressError::Base58(e) => Some(e),
            AddressError::Bech32(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Base58Error> for AddressError {
    fn from(e: Base58Error) -> Self {
        AddressError::Base58(e)
    }
}

impl From<Bech32Error> for AddressError {
    fn from(e: Bech32Error) -> Self {
        AddressError::Bech32(e)
    }
}
