//! Base58 and Base58Check encoding with the Bitcoin alphabet.
//!
//! Base58Check layout: `version || payload || SHA256d(version || payload)[..4]`.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use crate::hash::double_sha256;

const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Length of the Base58Check checksum suffix.
const CHECKSUM_LEN: usize = 4;

/// Base58 / Base58Check decoding errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Base58Error {
    /// Character outside the Bitcoin Base58 alphabet
    InvalidCharacter(char),
    /// Checksum does not match the payload
    ChecksumMismatch,
    /// Decoded data too short to hold a version byte and checksum
    TooShort(usize),
}

impl core::fmt::Display for Base58Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Base58Error::InvalidCharacter(c) => write!(f, "Invalid Base58 character: {}", c),
            Base58Error::ChecksumMismatch => write!(f, "Base58Check checksum mismatch"),
            Base58Error::TooShort(len) => write!(f, "Base58Check data too short: {} bytes", len),
        }
    }
}

impl core::error::Error for Base58Error {}

/// Encode raw bytes as Base58.
///
/// Each leading zero byte becomes a leading `'1'`.
pub fn encode(data: &[u8]) -> String {
    let leading_zeros = data.iter().take_while(|&&b| b == 0).count();

    // Base58 digits, least significant first
    let mut digits: Vec<u8> = Vec::with_capacity(data.len() * 138 / 100 + 1);
    for &byte in &data[leading_zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            let temp = (*digit as u32) * 256 + carry;
            *digit = (temp % 58) as u8;
            carry = temp / 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut result = String::with_capacity(leading_zeros + digits.len());
    for _ in 0..leading_zeros {
        result.push('1');
    }
    for &digit in digits.iter().rev() {
        result.push(BASE58_ALPHABET[digit as usize] as char);
    }
    result
}

/// Decode a Base58 string into raw bytes.
pub fn decode(input: &str) -> Result<Vec<u8>, Base58Error> {
    let mut result = Vec::new();

    // Count leading '1's (they become leading zeros)
    let leading_zeros = input.chars().take_while(|&c| c == '1').count();

    for c in input.chars() {
        let value = BASE58_ALPHABET
            .iter()
            .position(|&x| c.is_ascii() && x == c as u8)
            .ok_or(Base58Error::InvalidCharacter(c))? as u32;

        // Multiply result by 58 and add value
        let mut carry = value;
        for byte in result.iter_mut().rev() {
            let temp = (*byte as u32) * 58 + carry;
            *byte = (temp & 0xFF) as u8;
            carry = temp >> 8;
        }

        while carry > 0 {
            result.insert(0, (carry & 0xFF) as u8);
            carry >>= 8;
        }
    }

    // Add leading zeros
    let mut final_result = vec![0u8; leading_zeros];
    final_result.extend(result);

    Ok(final_result)
}

/// Base58Check-encode `payload` behind a single version byte.
pub fn encode_check(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN);
    data.push(version);
    data.extend_from_slice(payload);

    let checksum = double_sha256(&data);
    data.extend_from_slice(&checksum[..CHECKSUM_LEN]);

    encode(&data)
}

/// Decode a Base58Check string into `(version, payload)`.
pub fn decode_check(input: &str) -> Result<(u8, Vec<u8>), Base58Error> {
    let decoded = decode(input)?;

    if decoded.len() < 1 + CHECKSUM_LEN {
        return Err(Base58Error::TooShort(decoded.len()));
    }

    let (data, checksum) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    if checksum != &double_sha256(data)[..CHECKSUM_LEN] {
        return Err(Base58Error::ChecksumMismatch);
    }

    Ok((data[0], data[1..].to_vec()))
}
