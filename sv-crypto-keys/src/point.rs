use crate::error::{Error, Result};
use crate::scalar::Scalar;
use k256::elliptic_curve::group::GroupEncoding;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::Field;
use k256::{AffinePoint, EncodedPoint, ProjectivePoint, Scalar as K256Scalar};

/// A curve point carrying its own pair of compressed-serialization tag
/// bytes, so `Point` (secp256k1 pubkeys, tags `0x02`/`0x03`) and
/// `Commitment` (Pedersen commitments, tags `0x08`/`0x09`, §3) cannot be
/// confused at the type level despite sharing identical point arithmetic.
///
/// Public so `sv-crypto-ring-signature` can build the commitment generator
/// `H` and the `Commitment` type on top of the same arithmetic; not meant
/// to be used outside this workspace's crypto crates.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct CurvePoint(pub ProjectivePoint);

impl CurvePoint {
    pub fn parse(bytes: &[u8; 33], even_tag: u8, odd_tag: u8) -> Result<Self> {
        if bytes[0] != even_tag && bytes[0] != odd_tag {
            return Err(Error::InvalidPoint);
        }
        // The underlying curve arithmetic only understands the standard
        // 0x02/0x03 SEC1 tags, so re-tag before decoding.
        let mut sec1 = *bytes;
        sec1[0] = if bytes[0] == even_tag { 0x02 } else { 0x03 };
        let encoded = EncodedPoint::from_bytes(sec1).map_err(|_| Error::InvalidPoint)?;
        let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or(Error::InvalidPoint)?;
        Ok(Self(ProjectivePoint::from(affine)))
    }

    pub fn to_bytes(self, even_tag: u8, odd_tag: u8) -> [u8; 33] {
        let affine = self.0.to_affine();
        let encoded = affine.to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(encoded.as_bytes());
        out[0] = if out[0] == 0x02 { even_tag } else { odd_tag };
        out
    }

    pub fn identity() -> Self {
        Self(ProjectivePoint::IDENTITY)
    }

    pub fn generator() -> Self {
        Self(ProjectivePoint::GENERATOR)
    }

    pub fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }

    pub fn mul(self, scalar: &K256Scalar) -> Self {
        Self(self.0 * scalar)
    }
}

/// A compressed secp256k1 public key / stealth destination point.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Point(pub(crate) CurvePoint);

impl Point {
    pub const EVEN_TAG: u8 = 0x02;
    pub const ODD_TAG: u8 = 0x03;

    pub fn from_bytes(bytes: &[u8; 33]) -> Result<Self> {
        Ok(Self(CurvePoint::parse(bytes, Self::EVEN_TAG, Self::ODD_TAG)?))
    }

    pub fn to_bytes(self) -> [u8; 33] {
        self.0.to_bytes(Self::EVEN_TAG, Self::ODD_TAG)
    }

    pub fn generator() -> Self {
        Self(CurvePoint::generator())
    }

    /// Exposes the underlying curve point for sibling crypto crates that
    /// need raw point arithmetic (e.g. Pedersen commitments).
    pub fn curve_point(&self) -> CurvePoint {
        self.0
    }

    pub fn from_curve_point(point: CurvePoint) -> Self {
        Self(point)
    }
}

impl TryFrom<&[u8]> for Point {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self> {
        if src.len() != 33 {
            return Err(Error::LengthMismatch(33, src.len()));
        }
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(src);
        Point::from_bytes(&bytes)
    }
}

impl AsRef<CurvePoint> for Point {
    fn as_ref(&self) -> &CurvePoint {
        &self.0
    }
}

impl core::fmt::Debug for Point {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Point({})", hex::encode(self.to_bytes()))
    }
}

/// `derivePub(sk) -> Pk`
pub fn derive_pub(sk: &Scalar) -> Result<Point> {
    let inner = sk_to_k256(sk)?;
    Ok(Point(CurvePoint::generator().mul(&inner)))
}

/// `pointAddScalar(P, s) -> P + s*G`
pub fn point_add_scalar(p: &Point, s: &Scalar) -> Result<Point> {
    let inner = sk_to_k256(s)?;
    let addend = CurvePoint::generator().mul(&inner);
    Ok(Point(p.0.add(addend)))
}

/// `pointMultiply(P, s) -> s*P`
pub fn point_multiply(p: &Point, s: &Scalar) -> Result<Point> {
    let inner = sk_to_k256(s)?;
    Ok(Point(p.0.mul(&inner)))
}

fn sk_to_k256(s: &Scalar) -> Result<K256Scalar> {
    s.inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn derive_pub_roundtrips_through_bytes() {
        let sk = Scalar::random(&mut OsRng);
        let pk = derive_pub(&sk).unwrap();
        let bytes = pk.to_bytes();
        assert!(bytes[0] == 0x02 || bytes[0] == 0x03);
        let pk2 = Point::from_bytes(&bytes).unwrap();
        assert_eq!(pk, pk2);
    }

    #[test]
    fn point_add_scalar_matches_two_derivations() {
        let a = Scalar::random(&mut OsRng);
        let b = Scalar::random(&mut OsRng);
        let sum = a.add(&b).unwrap();

        let p_a = derive_pub(&a).unwrap();
        let lhs = point_add_scalar(&p_a, &b).unwrap();
        let rhs = derive_pub(&sum).unwrap();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn rejects_wrong_prefix() {
        let sk = Scalar::random(&mut OsRng);
        let pk = derive_pub(&sk).unwrap();
        let mut bytes = pk.to_bytes();
        bytes[0] = 0x08; // commitment tag, not a valid Point tag
        assert!(Point::from_bytes(&bytes).is_err());
    }
}
