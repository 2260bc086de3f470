//! secp256k1 operations needed by key validation and the Taproot tweak.
//!
//! Callers pass a [`CurveOps`] value explicitly; nothing here holds global
//! state. [`Secp256k1`] is the default backend, built on `k256`.

use k256::elliptic_curve::ff::PrimeField;
use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::point::DecompressPoint;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::subtle::Choice;
use k256::{AffinePoint, FieldBytes, ProjectivePoint, Scalar};

/// Parity of a point's y-coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    /// 0 for even, 1 for odd.
    pub fn to_u8(self) -> u8 {
        match self {
            Parity::Even => 0,
            Parity::Odd => 1,
        }
    }
}

/// Elliptic-curve capability consumed by key validation and Taproot tweaking.
pub trait CurveOps {
    /// A curve point (never the point at infinity).
    type Point;
    /// A scalar reduced below the group order.
    type Scalar;

    /// Whether `encoded` is a SEC1 compressed or uncompressed point on the curve.
    fn is_valid_public_key(&self, encoded: &[u8]) -> bool;

    /// BIP340 `lift_x`: the point with x-coordinate `x` and even y, if one exists.
    fn lift_x(&self, x: &[u8; 32]) -> Option<Self::Point>;

    /// Interpret 32 big-endian bytes as a scalar. `None` if the value is not below the group order.
    fn scalar_from_be_bytes(&self, bytes: &[u8; 32]) -> Option<Self::Scalar>;

    /// `point + scalar * G`, or `None` for the point at infinity.
    fn add_generator_multiple(&self, point: &Self::Point, scalar: &Self::Scalar) -> Option<Self::Point>;

    /// The x-coordinate of `point` and the parity of its y-coordinate.
    fn x_only(&self, point: &Self::Point) -> ([u8; 32], Parity);
}

/// secp256k1 backend built on the pure-Rust `k256` crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Secp256k1;

impl CurveOps for Secp256k1 {
    type Point = AffinePoint;
    type Scalar = Scalar;

    fn is_valid_public_key(&self, encoded: &[u8]) -> bool {
        k256::PublicKey::from_sec1_bytes(encoded).is_ok()
    }

    fn lift_x(&self, x: &[u8; 32]) -> Option<AffinePoint> {
        let x_bytes = FieldBytes::from(*x);
        AffinePoint::decompress(&x_bytes, Choice::from(0)).into()
    }

    fn scalar_from_be_bytes(&self, bytes: &[u8; 32]) -> Option<Scalar> {
        Scalar::from_repr(FieldBytes::from(*bytes)).into()
    }

    fn add_generator_multiple(&self, point: &AffinePoint, scalar: &Scalar) -> Option<AffinePoint> {
        let sum = ProjectivePoint::from(*point) + ProjectivePoint::GENERATOR * *scalar;
        if bool::from(sum.is_identity()) {
            return None;
        }
        Some(AffinePoint::from(sum))
    }

    fn x_only(&self, point: &AffinePoint) -> ([u8; 32], Parity) {
        let encoded = point.to_encoded_point(true);
        let bytes = encoded.as_bytes();

        let mut x = [0u8; 32];
        x.copy_from_slice(&bytes[1..33]);
        let parity = if bytes[0] == 0x03 { Parity::Odd } else { Parity::Even };
        (x, parity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATOR_X: &str = "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    fn x_bytes(hex_x: &str) -> [u8; 32] {
        let mut x = [0u8; 32];
        x.copy_from_slice(&hex::decode(hex_x).unwrap());
        x
    }

    #[test]
    fn test_lift_x_even_y() {
        let curve = Secp256k1;
        let point = curve.lift_x(&x_bytes(GENERATOR_X)).unwrap();
        let (x, parity) = curve.x_only(&point);

        assert_eq!(hex::encode(x), GENERATOR_X);
        assert_eq!(parity, Parity::Even);
    }

    #[test]
    fn test_lift_x_off_curve() {
        let curve = Secp256k1;
        let mut x = [0u8; 32];
        // x^3 + 7 is not a square for x = 0 and x = 5
        assert!(curve.lift_x(&x).is_none());
        x[31] = 5;
        assert!(curve.lift_x(&x).is_none());
        x[31] = 1;
        assert!(curve.lift_x(&x).is_some());
    }

    #[test]
    fn test_scalar_range() {
        let curve = Secp256k1;
        assert!(curve.scalar_from_be_bytes(&[0u8; 32]).is_some());
        assert!(curve.scalar_from_be_bytes(&[0xff; 32]).is_none());

        // Group order n is rejected, n - 1 accepted
        let n = x_bytes("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");
        let n_minus_one = x_bytes("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140");
        assert!(curve.scalar_from_be_bytes(&n).is_none());
        assert!(curve.scalar_from_be_bytes(&n_minus_one).is_some());
    }

    #[test]
    fn test_add_generator_multiple() {
        let curve = Secp256k1;
        let g = curve.lift_x(&x_bytes(GENERATOR_X)).unwrap();

        // G + 1*G = 2G
        let mut one = [0u8; 32];
        one[31] = 1;
        let scalar = curve.scalar_from_be_bytes(&one).unwrap();
        let (x, parity) = curve.x_only(&curve.add_generator_multiple(&g, &scalar).unwrap());
        assert_eq!(hex::encode(x), "c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5");
        assert_eq!(parity, Parity::Even);

        // G + (n-1)*G = infinity
        let minus_one = curve
            .scalar_from_be_bytes(&x_bytes("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140"))
            .unwrap();
        assert!(curve.add_generator_multiple(&g, &minus_one).is_none());
    }

    #[test]
    fn test_is_valid_public_key() {
        let curve = Secp256k1;
        let compressed = hex::decode(["02", GENERATOR_X].concat()).unwrap();
        assert!(curve.is_valid_public_key(&compressed));

        let mut off_curve = [0u8; 33];
        off_curve[0] = 0x02;
        off_curve[32] = 5;
        assert!(!curve.is_valid_public_key(&off_curve));
        assert!(!curve.is_valid_public_key(&[0x02; 10]));
    }
}
