//! scriptPubKey templates for the standard single-key output types.
//!
//! - P2PKH: `OP_DUP OP_HASH160 <20-byte-hash> OP_EQUALVERIFY OP_CHECKSIG`
//! - P2SH: `OP_HASH160 <20-byte-hash> OP_EQUAL`
//! - P2WPKH: `OP_0 <20-byte-hash>`
//! - P2WSH: `OP_0 <32-byte-hash>`
//! - P2TR: `OP_1 <32-byte-x-only-pubkey>`

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;
use crate::bech32::WitnessProgram;

pub const OP_0: u8 = 0x00;
pub const OP_PUSHBYTES_20: u8 = 0x14;
pub const OP_PUSHBYTES_32: u8 = 0x20;
pub const OP_1: u8 = 0x51;
pub const OP_16: u8 = 0x60;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_CHECKSIG: u8 = 0xac;

/// Locking script template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    /// Legacy P2PKH: OP_DUP OP_HASH160 <20-byte-hash> OP_EQUALVERIFY OP_CHECKSIG
    P2PKH,
    /// P2SH: OP_HASH160 <20-byte-hash> OP_EQUAL
    P2SH,
    /// Native SegWit v0 P2WPKH: OP_0 <20-byte-hash>
    P2WPKH,
    /// Native SegWit v0 P2WSH: OP_0 <32-byte-hash>
    P2WSH,
    /// Taproot P2TR: OP_1 <32-byte-x-only-pubkey>
    P2TR,
    /// Any other valid witness program (future SegWit versions)
    WitnessUnknown,
    /// Anything else
    NonStandard,
}

impl ScriptKind {
    /// Get the display name for this script kind.
    pub fn name(&self) -> &'static str {
        match self {
            ScriptKind::P2PKH => "P2PKH",
            ScriptKind::P2SH => "P2SH",
            ScriptKind::P2WPKH => "P2WPKH",
            ScriptKind::P2WSH => "P2WSH",
            ScriptKind::P2TR => "P2TR",
            ScriptKind::WitnessUnknown => "WitnessUnknown",
            ScriptKind::NonStandard => "NonStandard",
        }
    }

    fn for_witness(version: u8, program_len: usize) -> Self {
        match (version, program_len) {
            (0, 20) => ScriptKind::P2WPKH,
            (0, 32) => ScriptKind::P2WSH,
            (1, 32) => ScriptKind::P2TR,
            _ => ScriptKind::WitnessUnknown,
        }
    }
}

/// A locking script tagged with its template kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptPubKey {
    kind: ScriptKind,
    bytes: Vec<u8>,
}

impl ScriptPubKey {
    /// Build a P2PKH script from a HASH160 of a public key.
    pub fn p2pkh(pubkey_hash: &[u8; 20]) -> Self {
        let mut script = Vec::with_capacity(25);
        script.push(OP_DUP);
        script.push(OP_HASH160);
        script.push(OP_PUSHBYTES_20);
        script.extend_from_slice(pubkey_hash);
        script.push(OP_EQUALVERIFY);
        script.push(OP_CHECKSIG);

        ScriptPubKey { kind: ScriptKind::P2PKH, bytes: script }
    }

    /// Build a P2SH script from a HASH160 of a redeem script.
    pub fn p2sh(script_hash: &[u8; 20]) -> Self {
        let mut script = Vec::with_capacity(23);
        script.push(OP_HASH160);
        script.push(OP_PUSHBYTES_20);
        script.extend_from_slice(script_hash);
        script.push(OP_EQUAL);

        ScriptPubKey { kind: ScriptKind::P2SH, bytes: script }
    }

    /// Build a P2WPKH script from a HASH160 of a compressed public key.
    pub fn p2wpkh(pubkey_hash: &[u8; 20]) -> Self {
        let mut script = Vec::with_capacity(22);
        script.push(OP_0);
        script.push(OP_PUSHBYTES_20);
        script.extend_from_slice(pubkey_hash);

        ScriptPubKey { kind: ScriptKind::P2WPKH, bytes: script }
    }

    /// Build a P2TR script from a tweaked x-only output key.
    pub fn p2tr(output_key: &[u8; 32]) -> Self {
        let mut script = Vec::with_capacity(34);
        script.push(OP_1);
        script.push(OP_PUSHBYTES_32);
        script.extend_from_slice(output_key);

        ScriptPubKey { kind: ScriptKind::P2TR, bytes: script }
    }

    /// Build `OP_n <program>` for any witness program.
    pub fn from_witness_program(program: &WitnessProgram) -> Self {
        // OP_0 = 0x00, OP_1 = 0x51, OP_2 = 0x52, etc.
        let version = program.version();
        let version_opcode = if version == 0 { OP_0 } else { OP_1 - 1 + version };

        let mut script = Vec::with_capacity(2 + program.program().len());
        script.push(version_opcode);
        script.push(program.program().len() as u8);
        script.extend_from_slice(program.program());

        ScriptPubKey {
            kind: ScriptKind::for_witness(version, program.program().len()),
            bytes: script,
        }
    }

    /// Classify raw script bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let kind = classify(&bytes);
        ScriptPubKey { kind, bytes }
    }

    pub fn kind(&self) -> ScriptKind {
        self.kind
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// The witness program carried by a SegWit script, if any.
    pub fn witness_program(&self) -> Option<WitnessProgram> {
        parse_witness_program(&self.bytes)
    }

    /// Render the script as ASM, e.g. `OP_0 OP_PUSHBYTES_20 751e...`.
    ///
    /// Only direct pushes (1..=75 bytes) and the opcodes used by the
    /// standard templates have names; other opcodes print as `OP_UNKNOWN_xx`.
    pub fn asm(&self) -> String {
        let mut out = String::new();
        let mut i = 0;
        while i < self.bytes.len() {
            if !out.is_empty() {
                out.push(' ');
            }
            let opcode = self.bytes[i];
            i += 1;
            // Writing into a String cannot fail
            let _ = match opcode {
                0x01..=0x4b => {
                    let end = (i + opcode as usize).min(self.bytes.len());
                    let data = &self.bytes[i..end];
                    i = end;
                    write!(out, "OP_PUSHBYTES_{} {}", opcode, hex::encode(data))
                }
                OP_0 => write!(out, "OP_0"),
                OP_1..=OP_16 => write!(out, "OP_{}", opcode - OP_1 + 1),
                OP_DUP => write!(out, "OP_DUP"),
                OP_EQUAL => write!(out, "OP_EQUAL"),
                OP_EQUALVERIFY => write!(out, "OP_EQUALVERIFY"),
                OP_HASH160 => write!(out, "OP_HASH160"),
                OP_CHECKSIG => write!(out, "OP_CHECKSIG"),
                other => write!(out, "OP_UNKNOWN_{:02x}", other),
            };
        }
        out
    }
}

impl AsRef<[u8]> for ScriptPubKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

fn classify(bytes: &[u8]) -> ScriptKind {
    match bytes {
        [OP_DUP, OP_HASH160, OP_PUSHBYTES_20, .., OP_EQUALVERIFY, OP_CHECKSIG] if bytes.len() == 25 => {
            ScriptKind::P2PKH
        }
        [OP_HASH160, OP_PUSHBYTES_20, .., OP_EQUAL] if bytes.len() == 23 => ScriptKind::P2SH,
        _ => match parse_witness_program(bytes) {
            Some(wp) => ScriptKind::for_witness(wp.version(), wp.program().len()),
            None => ScriptKind::NonStandard,
        },
    }
}

/// `OP_n <push program>` with a single direct push covering the rest of the script.
fn parse_witness_program(bytes: &[u8]) -> Option<WitnessProgram> {
    let (&opcode, rest) = bytes.split_first()?;
    let version = match opcode {
        OP_0 => 0,
        OP_1..=OP_16 => opcode - OP_1 + 1,
        _ => return None,
    };
    let (&push_len, program) = rest.split_first()?;
    if push_len as usize != program.len() {
        return None;
    }
    WitnessProgram::new(version, program.to_vec()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const HASH: [u8; 20] = [
        0x75, 0x1e, 0x76, 0xe8, 0x19, 0x91, 0x96, 0xd4, 0x54, 0x94,
        0x1c, 0x45, 0xd1, 0xb3, 0xa3, 0x23, 0xf1, 0x43, 0x3b, 0xd6,
    ];

    #[test]
    fn test_p2pkh_script() {
        let script = ScriptPubKey::p2pkh(&HASH);

        assert_eq!(script.kind(), ScriptKind::P2PKH);
        assert_eq!(script.to_hex(), "76a914751e76e8199196d454941c45d1b3a323f1433bd688ac");
        assert_eq!(
            script.asm(),
            "OP_DUP OP_HASH160 OP_PUSHBYTES_20 751e76e8199196d454941c45d1b3a323f1433bd6 OP_EQUALVERIFY OP_CHECKSIG"
        );
    }

    #[test]
    fn test_p2sh_script() {
        let script = ScriptPubKey::p2sh(&HASH);

        assert_eq!(script.len(), 23);
        assert_eq!(script.as_bytes()[0], 0xa9); // OP_HASH160
        assert_eq!(script.as_bytes()[22], 0x87); // OP_EQUAL
    }

    #[test]
    fn test_p2wpkh_script() {
        let script = ScriptPubKey::p2wpkh(&HASH);

        assert_eq!(script.to_hex(), "0014751e76e8199196d454941c45d1b3a323f1433bd6");
        assert_eq!(script.asm(), "OP_0 OP_PUSHBYTES_20 751e76e8199196d454941c45d1b3a323f1433bd6");

        let wp = script.witness_program().unwrap();
        assert_eq!(wp.version(), 0);
        assert_eq!(wp.program(), &HASH[..]);
    }

    #[test]
    fn test_p2tr_script() {
        let script = ScriptPubKey::p2tr(&[0xab; 32]);

        assert_eq!(script.len(), 34);
        assert_eq!(script.as_bytes()[0], 0x51); // OP_1
        assert_eq!(script.as_bytes()[1], 0x20); // Push 32 bytes
        assert!(script.asm().starts_with("OP_1 OP_PUSHBYTES_32 abab"));
    }

    #[test]
    fn test_witness_program_scripts() {
        let v16 = WitnessProgram::new(16, vec![0x75, 0x1e]).unwrap();
        let script = ScriptPubKey::from_witness_program(&v16);
        assert_eq!(script.to_hex(), "6002751e");
        assert_eq!(script.kind(), ScriptKind::WitnessUnknown);

        let v1 = WitnessProgram::new(1, vec![0xcd; 32]).unwrap();
        assert_eq!(ScriptPubKey::from_witness_program(&v1), ScriptPubKey::p2tr(&[0xcd; 32]));

        let v0 = WitnessProgram::new(0, HASH.to_vec()).unwrap();
        assert_eq!(ScriptPubKey::from_witness_program(&v0), ScriptPubKey::p2wpkh(&HASH));
    }

    #[test]
    fn test_classify() {
        let cases = [
            (ScriptPubKey::p2pkh(&HASH), ScriptKind::P2PKH),
            (ScriptPubKey::p2sh(&HASH), ScriptKind::P2SH),
            (ScriptPubKey::p2wpkh(&HASH), ScriptKind::P2WPKH),
            (ScriptPubKey::p2tr(&[1; 32]), ScriptKind::P2TR),
        ];
        for (script, kind) in cases {
            assert_eq!(ScriptPubKey::from_bytes(script.into_bytes()).kind(), kind);
        }

        let mut p2wsh = vec![0x00, 0x20];
        p2wsh.extend_from_slice(&[0u8; 32]);
        assert_eq!(ScriptPubKey::from_bytes(p2wsh).kind(), ScriptKind::P2WSH);

        assert_eq!(ScriptPubKey::from_bytes(vec![0x6a, 0x01, 0x00]).kind(), ScriptKind::NonStandard);
        // Push length disagrees with the remaining bytes
        assert_eq!(ScriptPubKey::from_bytes(vec![0x00, 0x14, 0x01]).kind(), ScriptKind::NonStandard);
    }

    #[test]
    fn test_asm_unknown_opcode() {
        let script = ScriptPubKey::from_bytes(vec![0x6a, 0x02, 0xbe, 0xef]);
        assert_eq!(script.asm(), "OP_UNKNOWN_6a OP_PUSHBYTES_2 beef");
    }
}
