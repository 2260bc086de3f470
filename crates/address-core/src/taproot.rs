//! BIP341 key-path output key computation.
//!
//! For an internal x-only key `P` with no script tree:
//!
//! ```text
//! t = int(tagged_hash("TapTweak", P))      fail if t >= n
//! Q = lift_x(P) + t*G                      fail if Q is infinity
//! output key = x(Q)
//! ```

use crate::curve::{CurveOps, Parity};
use crate::error::AddressError;
use crate::hash::tagged_hash;
use crate::key::XOnlyPublicKey;

/// Tag for the BIP341 tweak hash.
pub const TAP_TWEAK_TAG: &str = "TapTweak";

/// The result of tweaking an internal key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweakedPublicKey {
    /// The internal (untweaked) x-only key.
    pub internal_key: XOnlyPublicKey,
    /// The 32-byte tweak `tagged_hash("TapTweak", P)`.
    pub tweak: [u8; 32],
    /// The x-only output key committed to by the P2TR script.
    pub output_key: XOnlyPublicKey,
    /// Parity of the output point's y-coordinate; needed only for spending.
    pub parity: Parity,
}

/// Computes Taproot output keys using an injected curve backend.
#[derive(Debug, Clone, Default)]
pub struct TaprootTweaker<C> {
    curve: C,
}

impl<C: CurveOps> TaprootTweaker<C> {
    pub fn new(curve: C) -> Self {
        TaprootTweaker { curve }
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    /// Tweak `internal_key` for a key-path-only output (no script tree).
    pub fn tweak(&self, internal_key: &XOnlyPublicKey) -> Result<TweakedPublicKey, AddressError> {
        let tweak = tap_tweak_hash(internal_key);

        let scalar = self
            .curve
            .scalar_from_be_bytes(&tweak)
            .ok_or(AddressError::InvalidTweak)?;

        let point = self
            .curve
            .lift_x(internal_key.as_bytes())
            .ok_or(AddressError::InvalidInternalKey)?;

        let tweaked = self
            .curve
            .add_generator_multiple(&point, &scalar)
            .ok_or(AddressError::TweakFailure)?;

        let (output_x, parity) = self.curve.x_only(&tweaked);

        Ok(TweakedPublicKey {
            internal_key: *internal_key,
            tweak,
            output_key: XOnlyPublicKey::from_bytes(output_x)?,
            parity,
        })
    }
}

/// `tagged_hash("TapTweak", P)` for a key-path-only output.
pub fn tap_tweak_hash(internal_key: &XOnlyPublicKey) -> [u8; 32] {
    tagged_hash(TAP_TWEAK_TAG, internal_key.as_bytes())
}
