//! Bech32 (BIP173) and Bech32m (BIP350) encoding of SegWit witness programs.
//!
//! A SegWit address is `hrp || '1' || data || checksum`, where `data` is the
//! witness version followed by the program regrouped into 5-bit values. The
//! two variants differ only in the constant XORed into the checksum: witness
//! version 0 uses Bech32, versions 1 through 16 use Bech32m.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

const BECH32_CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

const BECH32_CONST: u32 = 1;
const BECH32M_CONST: u32 = 0x2bc830a3;

/// Maximum total length of a Bech32 string.
const MAX_LENGTH: usize = 90;

/// Maximum length of the human-readable part.
const MAX_HRP_LENGTH: usize = 83;

const CHECKSUM_LENGTH: usize = 6;

/// Bech32 decoding and encoding errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bech32Error {
    /// Checksum does not verify for the variant the witness version requires
    InvalidChecksum,
    /// Witness version above 16
    InvalidWitnessVersion(u8),
    /// Witness program length outside the BIP141 rules
    InvalidProgramLength(usize),
    /// Character outside the Bech32 charset or printable ASCII range
    InvalidCharacter(char),
    /// Data value that does not fit the group size
    InvalidDataValue(u8),
    /// Upper and lower case letters mixed in one string
    MixedCase,
    /// No '1' separator between the human-readable part and the data
    MissingSeparator,
    /// Empty or oversized human-readable part
    InvalidHrp,
    /// String too long, or data part too short to hold a checksum
    InvalidLength(usize),
    /// Non-zero or oversized padding when regrouping 5-bit data to bytes
    InvalidPadding,
}

impl core::fmt::Display for Bech32Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Bech32Error::InvalidChecksum => write!(f, "Invalid Bech32 checksum"),
            Bech32Error::InvalidWitnessVersion(v) => write!(f, "Invalid witness version: {}", v),
            Bech32Error::InvalidProgramLength(l) => write!(f, "Invalid witness program length: {}", l),
            Bech32Error::InvalidCharacter(c) => write!(f, "Invalid Bech32 character: {:?}", c),
            Bech32Error::InvalidDataValue(v) => write!(f, "Invalid Bech32 data value: {}", v),
            Bech32Error::MixedCase => write!(f, "Mixed-case Bech32 string"),
            Bech32Error::MissingSeparator => write!(f, "No Bech32 separator found"),
            Bech32Error::InvalidHrp => write!(f, "Invalid Bech32 human-readable part"),
            Bech32Error::InvalidLength(l) => write!(f, "Invalid Bech32 string length: {}", l),
            Bech32Error::InvalidPadding => write!(f, "Invalid Bech32 padding"),
        }
    }
}

impl core::error::Error for Bech32Error {}

/// Checksum variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// BIP173, used for witness version 0
    Bech32,
    /// BIP350, used for witness versions 1 through 16
    Bech32m,
}

impl Variant {
    /// The variant BIP350 mandates for a witness version.
    pub fn for_witness_version(version: u8) -> Self {
        if version == 0 {
            Variant::Bech32
        } else {
            Variant::Bech32m
        }
    }

    fn constant(self) -> u32 {
        match self {
            Variant::Bech32 => BECH32_CONST,
            Variant::Bech32m => BECH32M_CONST,
        }
    }

    fn from_residue(residue: u32) -> Option<Self> {
        match residue {
            BECH32_CONST => Some(Variant::Bech32),
            BECH32M_CONST => Some(Variant::Bech32m),
            _ => None,
        }
    }
}

/// A SegWit witness program: version plus 2..=40 program bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WitnessProgram {
    version: u8,
    program: Vec<u8>,
}

impl WitnessProgram {
    /// Create a witness program, enforcing the BIP141 version and length rules.
    pub fn new(version: u8, program: Vec<u8>) -> Result<Self, Bech32Error> {
        if version > 16 {
            return Err(Bech32Error::InvalidWitnessVersion(version));
        }
        if !(2..=40).contains(&program.len()) {
            return Err(Bech32Error::InvalidProgramLength(program.len()));
        }
        if version == 0 && program.len() != 20 && program.len() != 32 {
            return Err(Bech32Error::InvalidProgramLength(program.len()));
        }
        Ok(WitnessProgram { version, program })
    }

    /// Witness version (0..=16).
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Witness program bytes.
    pub fn program(&self) -> &[u8] {
        &self.program
    }

    /// Checksum variant used when encoding this program.
    pub fn variant(&self) -> Variant {
        Variant::for_witness_version(self.version)
    }
}

/// Encode 5-bit `data` under `hrp` with the given checksum variant.
pub fn encode(hrp: &str, data: &[u8], variant: Variant) -> Result<String, Bech32Error> {
    validate_hrp(hrp)?;
    if let Some(&bad) = data.iter().find(|&&v| v >> 5 != 0) {
        return Err(Bech32Error::InvalidDataValue(bad));
    }

    let total = hrp.len() + 1 + data.len() + CHECKSUM_LENGTH;
    if total > MAX_LENGTH {
        return Err(Bech32Error::InvalidLength(total));
    }

    let hrp = hrp.to_ascii_lowercase();
    let checksum = create_checksum(&hrp, data, variant);

    let mut result = String::with_capacity(total);
    result.push_str(&hrp);
    result.push('1');
    for &value in data.iter().chain(checksum.iter()) {
        result.push(BECH32_CHARSET[value as usize] as char);
    }

    Ok(result)
}

/// Decode a Bech32 or Bech32m string into `(hrp, data, variant)`.
///
/// The returned HRP is lowercase and `data` excludes the checksum.
pub fn decode(input: &str) -> Result<(String, Vec<u8>, Variant), Bech32Error> {
    if input.len() > MAX_LENGTH {
        return Err(Bech32Error::InvalidLength(input.len()));
    }

    let mut has_lower = false;
    let mut has_upper = false;
    for c in input.chars() {
        if !('!'..='~').contains(&c) {
            return Err(Bech32Error::InvalidCharacter(c));
        }
        has_lower |= c.is_ascii_lowercase();
        has_upper |= c.is_ascii_uppercase();
    }
    if has_lower && has_upper {
        return Err(Bech32Error::MixedCase);
    }

    let input_lower = input.to_ascii_lowercase();

    // Find separator
    let sep_pos = input_lower.rfind('1').ok_or(Bech32Error::MissingSeparator)?;
    let hrp = &input_lower[..sep_pos];
    let data_part = &input_lower[sep_pos + 1..];

    validate_hrp(hrp)?;
    if data_part.len() < CHECKSUM_LENGTH {
        return Err(Bech32Error::InvalidLength(input.len()));
    }

    // Decode data characters
    let mut data = Vec::with_capacity(data_part.len());
    for c in data_part.chars() {
        let idx = BECH32_CHARSET
            .iter()
            .position(|&x| x == c as u8)
            .ok_or(Bech32Error::InvalidCharacter(c))?;
        data.push(idx as u8);
    }

    // Verify checksum and determine variant
    let residue = polymod(&hrp_expand(hrp), &data);
    let variant = Variant::from_residue(residue).ok_or(Bech32Error::InvalidChecksum)?;

    // Remove checksum from data (last 6 characters)
    data.truncate(data.len() - CHECKSUM_LENGTH);

    Ok((hrp.to_string(), data, variant))
}

/// Encode a witness program as a SegWit address, choosing the variant from its version.
pub fn encode_witness(hrp: &str, program: &WitnessProgram) -> Result<String, Bech32Error> {
    let mut data = Vec::with_capacity(1 + (program.program.len() * 8 + 4) / 5);
    data.push(program.version);
    data.extend(convert_bits(&program.program, 8, 5, true)?);

    encode(hrp, &data, program.variant())
}

/// Decode a SegWit address into `(hrp, witness program)`.
///
/// The checksum must match the variant its witness version requires: a
/// version 0 program under Bech32m, or a version 1+ program under Bech32,
/// is rejected as `InvalidChecksum`.
pub fn decode_witness(input: &str) -> Result<(String, WitnessProgram), Bech32Error> {
    let (hrp, data, variant) = decode(input)?;

    let (&version, payload) = data.split_first().ok_or(Bech32Error::InvalidProgramLength(0))?;
    if version > 16 {
        return Err(Bech32Error::InvalidWitnessVersion(version));
    }
    if variant != Variant::for_witness_version(version) {
        return Err(Bech32Error::InvalidChecksum);
    }

    let program = convert_bits(payload, 5, 8, false)?;
    Ok((hrp, WitnessProgram::new(version, program)?))
}

/// Regroup `data` from `from_bits`-bit values into `to_bits`-bit values.
///
/// With `pad` the final group is zero-padded; without it, leftover bits must
/// be fewer than `from_bits` and all zero.
pub fn convert_bits(data: &[u8], from_bits: u8, to_bits: u8, pad: bool) -> Result<Vec<u8>, Bech32Error> {
    let mut acc: u32 = 0;
    let mut bits: u8 = 0;
    let mut result = Vec::with_capacity(data.len() * from_bits as usize / to_bits as usize + 1);
    let max_value = (1u32 << to_bits) - 1;

    for &value in data {
        if (value as u32) >> from_bits != 0 {
            return Err(Bech32Error::InvalidDataValue(value));
        }
        acc = (acc << from_bits) | (value as u32);
        bits += from_bits;

        while bits >= to_bits {
            bits -= to_bits;
            result.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            result.push(((acc << (to_bits - bits)) & max_value) as u8);
        }
    } else if bits >= from_bits || ((acc << (to_bits - bits)) & max_value) != 0 {
        return Err(Bech32Error::InvalidPadding);
    }

    Ok(result)
}

fn validate_hrp(hrp: &str) -> Result<(), Bech32Error> {
    if hrp.is_empty() || hrp.len() > MAX_HRP_LENGTH {
        return Err(Bech32Error::InvalidHrp);
    }
    if let Some(c) = hrp.chars().find(|c| !('!'..='~').contains(c)) {
        return Err(Bech32Error::InvalidCharacter(c));
    }
    Ok(())
}

fn create_checksum(hrp: &str, data: &[u8], variant: Variant) -> [u8; CHECKSUM_LENGTH] {
    let mut values = Vec::with_capacity(data.len() + CHECKSUM_LENGTH);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0u8; CHECKSUM_LENGTH]);

    let residue = polymod(&hrp_expand(hrp), &values) ^ variant.constant();

    let mut checksum = [0u8; CHECKSUM_LENGTH];
    for (i, group) in checksum.iter_mut().enumerate() {
        *group = ((residue >> (5 * (5 - i))) & 31) as u8;
    }
    checksum
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let bytes = hrp.as_bytes();
    let mut result = Vec::with_capacity(bytes.len() * 2 + 1);

    result.extend(bytes.iter().map(|b| b >> 5));
    result.push(0);
    result.extend(bytes.iter().map(|b| b & 31));

    result
}

fn polymod(hrp: &[u8], data: &[u8]) -> u32 {
    const GEN: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

    let mut chk: u32 = 1;

    for &value in hrp.iter().chain(data.iter()) {
        let top = chk >> 25;
        chk = ((chk & 0x1ffffff) << 5) ^ (value as u32);
        for (i, &g) in GEN.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }

    chk
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn program(version: u8, hex_program: &str) -> WitnessProgram {
        WitnessProgram::new(version, hex::decode(hex_program).unwrap()).unwrap()
    }

    #[test]
    fn test_encode_p2wpkh_bip173() {
        let wp = program(0, "751e76e8199196d454941c45d1b3a323f1433bd6");
        assert_eq!(encode_witness("bc", &wp).unwrap(), "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
        assert_eq!(encode_witness("tb", &wp).unwrap(), "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx");
        assert_eq!(encode_witness("bcrt", &wp).unwrap(), "bcrt1qw508d6qejxtdg4y5r3zarvary0c5xw7kygt080");
    }

    #[test]
    fn test_encode_future_versions_bip350() {
        let v16 = program(16, "751e");
        assert_eq!(v16.variant(), Variant::Bech32m);
        assert_eq!(encode_witness("bc", &v16).unwrap(), "bc1sw50qgdz25j");

        let v2 = program(2, "751e76e8199196d454941c45d1b3a323");
        assert_eq!(encode_witness("bc", &v2).unwrap(), "bc1zw508d6qejxtdg4y5r3zarvaryvaxxpcs");
    }

    #[test]
    fn test_decode_witness_round_trip() {
        let cases = [
            ("bc", program(0, "751e76e8199196d454941c45d1b3a323f1433bd6")),
            ("tb", program(0, &"00".repeat(32))),
            ("bc", program(1, "53a1f6e454df1aa2776a2814a721372d6258050de330b3c6d10ee8f4e0dda343")),
            ("bcrt", program(5, &"ff".repeat(40))),
            ("tb", program(16, "0001")),
        ];

        for (hrp, wp) in cases {
            let encoded = encode_witness(hrp, &wp).unwrap();
            let (decoded_hrp, decoded) = decode_witness(&encoded).unwrap();
            assert_eq!(decoded_hrp, hrp);
            assert_eq!(decoded, wp);
        }
    }

    #[test]
    fn test_decode_uppercase() {
        let (hrp, wp) = decode_witness("BC1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KV8F3T4").unwrap();
        assert_eq!(hrp, "bc");
        assert_eq!(wp.version(), 0);
        assert_eq!(hex::encode(wp.program()), "751e76e8199196d454941c45d1b3a323f1433bd6");
    }

    #[test]
    fn test_decode_mixed_case() {
        assert_eq!(
            decode_witness("bc1qW508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"),
            Err(Bech32Error::MixedCase)
        );
    }

    #[test]
    fn test_wrong_variant_rejected() {
        // Version 1 program checksummed with Bech32 instead of Bech32m
        let mut data = vec![1u8];
        data.extend(convert_bits(&[0x42; 32], 8, 5, true).unwrap());
        let bech32_v1 = encode("bc", &data, Variant::Bech32).unwrap();
        assert_eq!(decode_witness(&bech32_v1), Err(Bech32Error::InvalidChecksum));

        // Version 0 program checksummed with Bech32m
        let mut data = vec![0u8];
        data.extend(convert_bits(&[0x42; 20], 8, 5, true).unwrap());
        let bech32m_v0 = encode("bc", &data, Variant::Bech32m).unwrap();
        assert_eq!(decode_witness(&bech32m_v0), Err(Bech32Error::InvalidChecksum));

        // The generic decoder still reports which variant verified
        assert_eq!(decode(&bech32m_v0).unwrap().2, Variant::Bech32m);
    }

    #[test]
    fn test_bip350_invalid_vector() {
        assert_eq!(
            decode_witness("bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7vqh2y7hd"),
            Err(Bech32Error::InvalidChecksum)
        );
    }

    #[test]
    fn test_invalid_witness_version() {
        // Data value 17 as witness version
        let mut data = vec![17u8];
        data.extend(convert_bits(&[0x00; 20], 8, 5, true).unwrap());
        let encoded = encode("bc", &data, Variant::Bech32m).unwrap();
        assert_eq!(decode_witness(&encoded), Err(Bech32Error::InvalidWitnessVersion(17)));

        assert_eq!(WitnessProgram::new(17, vec![0; 20]), Err(Bech32Error::InvalidWitnessVersion(17)));
    }

    #[test]
    fn test_invalid_program_length() {
        assert_eq!(WitnessProgram::new(1, vec![0; 1]), Err(Bech32Error::InvalidProgramLength(1)));
        assert_eq!(WitnessProgram::new(1, vec![0; 41]), Err(Bech32Error::InvalidProgramLength(41)));
        assert_eq!(WitnessProgram::new(0, vec![0; 21]), Err(Bech32Error::InvalidProgramLength(21)));
        assert!(WitnessProgram::new(1, vec![0; 21]).is_ok());

        // v0 with a 16-byte program encoded by hand
        let mut data = vec![0u8];
        data.extend(convert_bits(&[0x11; 16], 8, 5, true).unwrap());
        let encoded = encode("bc", &data, Variant::Bech32).unwrap();
        assert_eq!(decode_witness(&encoded), Err(Bech32Error::InvalidProgramLength(16)));
    }

    #[test]
    fn test_invalid_characters_and_structure() {
        assert_eq!(
            decode_witness("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3tb"),
            Err(Bech32Error::InvalidCharacter('b'))
        );
        assert_eq!(decode_witness("bcqw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"), Err(Bech32Error::MissingSeparator));
        assert_eq!(decode_witness("1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"), Err(Bech32Error::InvalidHrp));
        assert_eq!(decode_witness("bc1qw5"), Err(Bech32Error::InvalidLength(6)));
        assert!(matches!(decode_witness("bc1 qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"), Err(Bech32Error::InvalidCharacter(' '))));
    }

    #[test]
    fn test_single_character_corruption_detected() {
        let valid = "bc1p2wsldez5mud2yam29q22wgfh9439spgduvct83k3pm50fcxa5dps59h4z5";
        let sep = valid.rfind('1').unwrap();
        for i in sep + 1..valid.len() {
            let original = valid.as_bytes()[i];
            let replacement = if original == b'q' { 'p' } else { 'q' };
            let mut corrupted = String::from(&valid[..i]);
            corrupted.push(replacement);
            corrupted.push_str(&valid[i + 1..]);

            assert!(decode_witness(&corrupted).is_err(), "corruption at {} not detected", i);
        }
    }

    #[test]
    fn test_convert_bits_padding() {
        // 20 bytes = 160 bits = 32 five-bit groups, no padding needed
        assert_eq!(convert_bits(&[0xff; 20], 8, 5, true).unwrap().len(), 32);
        // 32 bytes = 256 bits -> 52 groups with 4 bits of padding
        assert_eq!(convert_bits(&[0xff; 32], 8, 5, true).unwrap().len(), 52);

        // Non-zero padding bits are rejected when converting back
        assert_eq!(convert_bits(&[0x1f, 0x1f], 5, 8, false), Err(Bech32Error::InvalidPadding));
        assert_eq!(convert_bits(&[0x20], 5, 8, false), Err(Bech32Error::InvalidDataValue(0x20)));
    }

    #[test]
    fn test_encode_rejects_bad_input() {
        assert_eq!(encode("", &[0], Variant::Bech32), Err(Bech32Error::InvalidHrp));
        assert_eq!(encode("bc", &[32], Variant::Bech32), Err(Bech32Error::InvalidDataValue(32)));
        assert_eq!(encode("bc", &[0; 82], Variant::Bech32), Err(Bech32Error::InvalidLength(91)));
    }
}
