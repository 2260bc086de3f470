//! Random key pairs for trying out the generator.
//!
//! Keys come straight from `getrandom` and are never stored. They are meant
//! for demonstrations, not for holding funds.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::error::BindingError;

/// Attempts before giving up on drawing a valid scalar.
const MAX_ATTEMPTS: usize = 8;

/// A freshly generated key pair, hex encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoKeyPair {
    pub secret_key: String,
    pub public_key: String,
    pub public_key_uncompressed: String,
}

impl DemoKeyPair {
    /// Generate a key pair from system entropy.
    pub fn generate() -> Result<Self, BindingError> {
        Ok(Self::from_secret(&random_secret_key()?))
    }

    fn from_secret(secret: &SecretKey) -> Self {
        let public = secret.public_key();
        DemoKeyPair {
            secret_key: hex::encode(secret.to_bytes()),
            public_key: hex::encode(public.to_encoded_point(true).as_bytes()),
            public_key_uncompressed: hex::encode(public.to_encoded_point(false).as_bytes()),
        }
    }
}

fn random_secret_key() -> Result<SecretKey, BindingError> {
    let mut bytes = [0u8; 32];
    for _ in 0..MAX_ATTEMPTS {
        getrandom::getrandom(&mut bytes).map_err(|e| BindingError::Entropy(e.to_string()))?;
        // Zero and values >= n are rejected
        if let Ok(secret) = SecretKey::from_slice(&bytes) {
            return Ok(secret);
        }
    }
    Err(BindingError::Entropy("no valid scalar drawn".to_string()))
}

/// Generate a random key pair for demonstrations.
///
/// Returns `{ secret_key, public_key, public_key_uncompressed }` as hex strings.
#[wasm_bindgen]
pub fn generate_demo_key() -> Result<JsValue, JsValue> {
    let pair = DemoKeyPair::generate()?;
    serde_wasm_bindgen::to_value(&pair)
        .map_err(|e| BindingError::Serialization(format!("{:?}", e)).into())
}
