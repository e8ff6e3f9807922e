use crate::error::{Error, Result};
use k256::elliptic_curve::Field;
use k256::Scalar as K256Scalar;
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

/// A curve-order scalar, stored as 32 big-endian bytes.
///
/// Zero is never a valid instance: every constructor rejects it, matching
/// the facade's "fail if result zero" policy for secret arithmetic.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Scalar([u8; 32]);

impl Scalar {
    /// Parses 32 big-endian bytes, requiring a canonical, non-zero reduction
    /// mod the curve order `n`.
    pub fn from_canonical_bytes(bytes: [u8; 32]) -> Result<Self> {
        let inner = Self::decode(&bytes)?;
        if bool::from(Field::is_zero(&inner)) {
            return Err(Error::InvalidScalar);
        }
        Ok(Self(bytes))
    }

    /// Draws a uniformly random non-zero scalar from a cryptographic RNG.
    ///
    /// Per §5, every blind, ephemeral secret and MLSAG nonce must come from
    /// this path; there is no seeded/deterministic mode.
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        loop {
            let candidate = K256Scalar::random(&mut *rng);
            if !bool::from(Field::is_zero(&candidate)) {
                return Self(candidate.to_bytes().into());
            }
        }
    }

    /// The all-zero scalar, used only where the protocol explicitly calls
    /// for a zero blind (the fee commitment, §4.3).
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn add(&self, other: &Scalar) -> Result<Scalar> {
        let sum = self.inner()? + other.inner()?;
        Self::from_field(sum)
    }

    pub fn sub(&self, other: &Scalar) -> Result<Scalar> {
        let diff = self.inner()? - other.inner()?;
        Self::from_field(diff)
    }

    pub fn mul(&self, other: &Scalar) -> Result<Scalar> {
        let prod = self.inner()? * other.inner()?;
        Self::from_field(prod)
    }

    pub(crate) fn inner(&self) -> Result<K256Scalar> {
        Self::decode(&self.0)
    }

    fn decode(bytes: &[u8; 32]) -> Result<K256Scalar> {
        let repr: k256::FieldBytes = (*bytes).into();
        Option::from(K256Scalar::from_repr(repr)).ok_or(Error::InvalidScalar)
    }

    fn from_field(value: K256Scalar) -> Result<Scalar> {
        if bool::from(Field::is_zero(&value)) {
            return Err(Error::InvalidScalar);
        }
        Ok(Scalar(value.to_bytes().into()))
    }
}

impl TryFrom<&[u8]> for Scalar {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self> {
        if src.len() != 32 {
            return Err(Error::LengthMismatch(32, src.len()));
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(src);
        Scalar::from_canonical_bytes(bytes)
    }
}

impl AsRef<[u8]> for Scalar {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// `privateAdd(a, b)` — `a + b mod n`, failing if the result is zero.
pub fn private_add(a: &Scalar, b: &Scalar) -> Result<Scalar> {
    a.add(b)
}

/// `privateSub(a, b)` — `a - b mod n`, failing if the result is zero.
pub fn private_sub(a: &Scalar, b: &Scalar) -> Result<Scalar> {
    a.sub(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn random_scalars_are_never_zero() {
        for _ in 0..64 {
            let s = Scalar::random(&mut OsRng);
            assert_ne!(s.as_bytes(), &[0u8; 32]);
        }
    }

    #[test]
    fn add_sub_are_inverse() {
        let a = Scalar::random(&mut OsRng);
        let b = Scalar::random(&mut OsRng);
        let sum = private_add(&a, &b).unwrap();
        let back = private_sub(&sum, &b).unwrap();
        assert_eq!(back.as_bytes(), a.as_bytes());
    }

    #[test]
    fn rejects_zero() {
        assert!(matches!(
            Scalar::from_canonical_bytes([0u8; 32]),
            Err(Error::InvalidScalar)
        ));
    }

    #[test]
    fn rejects_non_canonical_bytes() {
        // the curve order n, itself not a valid reduced scalar.
        let n = hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
            .unwrap();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&n);
        assert!(Scalar::from_canonical_bytes(bytes).is_err());
    }
}
