//! Step-by-step text breakdown of how each address is derived.

use std::fmt::Write;

use address_core::{AddressKind, AddressSet, DerivationDetails, DerivedAddress, PublicKey};

const RULE_WIDTH: usize = 60;

/// Render the derivation of every address in `set` from `key`.
pub fn render(key: &PublicKey, set: &AddressSet) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Address derivation on {}", set.network.display_name());
    let _ = writeln!(out, "Public key: {}", key);
    let _ = writeln!(out, "Compressed: {}", if key.is_compressed() { "yes" } else { "no" });

    for kind in AddressKind::ALL {
        out.push('\n');
        let _ = writeln!(out, "{} ({})", kind.name(), kind.label());
        let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
        match set.get(kind) {
            Some(derived) => render_steps(&mut out, key, derived),
            None => {
                let _ = writeln!(out, "Unavailable: requires a compressed public key");
            }
        }
    }

    out
}

fn render_steps(out: &mut String, key: &PublicKey, derived: &DerivedAddress) {
    let mut steps = Steps::new(out);
    steps.push("Public key", &key.to_hex());

    match &derived.details {
        DerivationDetails::P2PKH { pubkey_hash } => {
            steps.push("HASH160(pubkey) = RIPEMD160(SHA256(pubkey))", &hex::encode(pubkey_hash));
        }
        DerivationDetails::P2SHP2WPKH { redeem_script, script_hash } => {
            steps.push("Redeem script (P2WPKH program)", &redeem_script.asm());
            steps.push("HASH160(redeem script)", &hex::encode(script_hash));
        }
        DerivationDetails::P2WPKH { program } => {
            steps.push("HASH160(pubkey)", &hex::encode(program.program()));
            steps.push("Witness program", &format!("version {} {}", program.version(), hex::encode(program.program())));
        }
        DerivationDetails::P2TR { tweaked } => {
            steps.push("Internal key (x-only)", &tweaked.internal_key.to_hex());
            steps.push("Tweak t = tagged_hash(\"TapTweak\", P)", &hex::encode(tweaked.tweak));
            steps.push(
                "Output key Q = P + t*G",
                &format!("{} (y parity {})", tweaked.output_key, tweaked.parity.to_u8()),
            );
        }
    }

    steps.push("ScriptPubKey", &derived.script_pubkey.to_hex());
    steps.push("ASM", &derived.script_pubkey.asm());
    steps.push("Address", &derived.address);
}

struct Steps<'a> {
    out: &'a mut String,
    next: usize,
}

impl<'a> Steps<'a> {
    fn new(out: &'a mut String) -> Self {
        Steps { out, next: 1 }
    }

    fn push(&mut self, label: &str, value: &str) {
        let _ = writeln!(self.out, "{}. {}:", self.next, label);
        let _ = writeln!(self.out, "    {}", value);
        self.next += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use address_core::{AddressDeriver, Network};

    #[test]
    fn test_report_compressed_key() {
        let key = PublicKey::from_hex("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798").unwrap();
        let set = AddressDeriver::secp256k1().derive_all(&key, Network::Mainnet).unwrap();
        let report = render(&key, &set);

        assert!(report.starts_with("Address derivation on Bitcoin Mainnet\n"));
        assert!(report.contains("P2SH-P2WPKH (Nested SegWit)"));
        assert!(report.contains("    3JvL6Ymt8MVWiCNHC7oWU6nLeHNJKLZGLN\n"));
        assert!(report.contains("    da4710964f7852695de2da025290e24af6d8c281de5a0b902b7135fd9fd74d21 (y parity 1)\n"));
        assert!(report.contains("    bc1pmfr3p9j00pfxjh0zmgp99y8zftmd3s5pmedqhyptwy6lm87hf5sspknck9\n"));
        assert!(!report.contains("Unavailable"));
    }

    #[test]
    fn test_report_uncompressed_key() {
        let key = PublicKey::from_hex(
            "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798\
             483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8",
        )
        .unwrap();
        let set = AddressDeriver::secp256k1().derive_all(&key, Network::Mainnet).unwrap();
        let report = render(&key, &set);

        assert!(report.contains("Compressed: no"));
        assert_eq!(report.matches("Unavailable: requires a compressed public key").count(), 2);
        assert!(report.contains("    1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm\n"));
    }
}
