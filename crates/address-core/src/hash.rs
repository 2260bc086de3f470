//! Hash primitives used by address derivation.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Single SHA256 hash.
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Bitcoin's double SHA256: SHA256(SHA256(data)).
///
/// Used for the 4-byte Base58Check checksum.
#[inline]
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(&first).into()
}

/// Single RIPEMD-160 hash.
#[inline]
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// HASH160: RIPEMD160(SHA256(data)).
///
/// This is the hash committed to by P2PKH, P2WPKH and P2SH outputs.
#[inline]
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

/// BIP340 tagged hash: SHA256(SHA256(tag) || SHA256(tag) || msg).
pub fn tagged_hash(tag: &str, msg: &[u8]) -> [u8; 32] {
    let tag_hash = Sha256::digest(tag.as_bytes());
    let mut engine = Sha256::new();
    engine.update(&tag_hash);
    engine.update(&tag_hash);
    engine.update(msg);
    engine.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_double_sha256() {
        // Test vector: SHA256d("hello")
        let expected = hex::decode(
            "9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50"
        ).unwrap();

        assert_eq!(double_sha256(b"hello").as_slice(), expected.as_slice());
    }

    #[test]
    fn test_ripemd160() {
        assert_eq!(hex::encode(ripemd160(b"")), "9c1185a5c5e9fc54612808977ee8f548b2258d31");
        assert_eq!(hex::encode(ripemd160(b"abc")), "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc");
    }

    #[test]
    fn test_hash160() {
        assert_eq!(hex::encode(hash160(b"")), "b472a266d0bd89c13706a4132ccfb16f7c3b9fcb");

        // BIP141 example key (the secp256k1 generator point)
        let pubkey = hex::decode(
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        ).unwrap();
        assert_eq!(hex::encode(hash160(&pubkey)), "751e76e8199196d454941c45d1b3a323f1433bd6");
    }

    #[test]
    fn test_tagged_hash_matches_definition() {
        let tag = sha256(b"TapTweak");
        let mut preimage = [0u8; 64];
        preimage[..32].copy_from_slice(&tag);
        preimage[32..].copy_from_slice(&tag);

        assert_eq!(tagged_hash("TapTweak", b""), sha256(&preimage));
        assert_eq!(
            hex::encode(tagged_hash("TapTweak", b"")),
            "8aa4229474ab0100b2d6f0687f031d1fc9d8eef92a042ad97d279bff456b15e4"
        );
    }

    #[test]
    fn test_tagged_hash_bip341_tweak() {
        let internal = hex::decode(
            "d6889cb081036e0faefa3a35157ad71086b123b2b144b649798b494c300a961d"
        ).unwrap();

        assert_eq!(
            hex::encode(tagged_hash("TapTweak", &internal)),
            "b86e7be8f39bab32a6f2c0443abbc210f0edac0e2c53d501b36b64437d9c6c70"
        );
    }
}
