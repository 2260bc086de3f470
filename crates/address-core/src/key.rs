//! Public key encodings accepted by address derivation.

use alloc::string::String;
use crate::curve::CurveOps;
use crate::error::AddressError;

/// The secp256k1 field prime p, big-endian.
const FIELD_PRIME: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xfc, 0x2f,
];

/// Whether a 32-byte big-endian value is a valid field element (< p).
fn is_field_element(bytes: &[u8]) -> bool {
    bytes < &FIELD_PRIME[..]
}

/// A SEC1-encoded secp256k1 public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicKey {
    /// 33 bytes: 0x02/0x03 prefix followed by x
    Compressed([u8; 33]),
    /// 65 bytes: 0x04 prefix followed by x and y
    Uncompressed([u8; 65]),
}

impl PublicKey {
    /// Length of a compressed encoding.
    pub const COMPRESSED_LEN: usize = 33;
    /// Length of an uncompressed encoding.
    pub const UNCOMPRESSED_LEN: usize = 65;

    /// Parse a key, checking length, prefix and that coordinates are field elements.
    ///
    /// This does not check that the point lies on the curve; use
    /// [`PublicKey::from_slice_checked`] for that.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        match bytes.len() {
            Self::COMPRESSED_LEN => {
                if bytes[0] != 0x02 && bytes[0] != 0x03 {
                    return Err(AddressError::InvalidPublicKey("compressed key must start with 0x02 or 0x03"));
                }
                if !is_field_element(&bytes[1..33]) {
                    return Err(AddressError::InvalidPublicKey("x-coordinate is not a field element"));
                }
                let mut key = [0u8; Self::COMPRESSED_LEN];
                key.copy_from_slice(bytes);
                Ok(PublicKey::Compressed(key))
            }
            Self::UNCOMPRESSED_LEN => {
                if bytes[0] != 0x04 {
                    return Err(AddressError::InvalidPublicKey("uncompressed key must start with 0x04"));
                }
                if !is_field_element(&bytes[1..33]) || !is_field_element(&bytes[33..65]) {
                    return Err(AddressError::InvalidPublicKey("coordinate is not a field element"));
                }
                let mut key = [0u8; Self::UNCOMPRESSED_LEN];
                key.copy_from_slice(bytes);
                Ok(PublicKey::Uncompressed(key))
            }
            _ => Err(AddressError::InvalidPublicKey("expected 33 or 65 bytes")),
        }
    }

    /// Parse a key and verify with `curve` that it is a point on secp256k1.
    pub fn from_slice_checked<C: CurveOps>(bytes: &[u8], curve: &C) -> Result<Self, AddressError> {
        let key = Self::from_slice(bytes)?;
        if !curve.is_valid_public_key(key.as_bytes()) {
            return Err(AddressError::InvalidPublicKey("point is not on the curve"));
        }
        Ok(key)
    }

    /// Parse a hex-encoded key (shape checks only).
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let bytes = hex::decode(s.trim()).map_err(|_| AddressError::InvalidPublicKey("invalid hex"))?;
        Self::from_slice(&bytes)
    }

    /// The SEC1 encoding.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PublicKey::Compressed(bytes) => bytes,
            PublicKey::Uncompressed(bytes) => bytes,
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, PublicKey::Compressed(_))
    }

    /// The x-coordinate, dropping the prefix byte (and y for uncompressed keys).
    pub fn x_only(&self) -> XOnlyPublicKey {
        let mut x = [0u8; 32];
        x.copy_from_slice(&self.as_bytes()[1..33]);
        XOnlyPublicKey(x)
    }

    /// Lowercase hex of the SEC1 encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl core::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// A BIP340 x-only public key: the 32-byte x-coordinate of a point with even y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XOnlyPublicKey([u8; 32]);

impl XOnlyPublicKey {
    /// Wrap 32 bytes, checking they form a field element.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, AddressError> {
        if !is_field_element(&bytes) {
            return Err(AddressError::InvalidPublicKey("x-coordinate is not a field element"));
        }
        Ok(XOnlyPublicKey(bytes))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidPublicKey("x-only key must be 32 bytes"))?;
        Self::from_bytes(array)
    }

    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let bytes = hex::decode(s.trim()).map_err(|_| AddressError::InvalidPublicKey("invalid hex"))?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl core::fmt::Display for XOnlyPublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<&PublicKey> for XOnlyPublicKey {
    fn from(key: &PublicKey) -> Self {
        key.x_only()
    }
}
