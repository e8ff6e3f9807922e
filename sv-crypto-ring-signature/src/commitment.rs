use crate::error::Result;
use crate::generators::pedersen_h;
use crate::scalar_ext::{k256_to_scalar, to_k256};
use k256::elliptic_curve::Field;
use sv_crypto_keys::{CurvePoint, Scalar};

/// A Pedersen commitment `r*G + v*H`, blinding an output amount `v` under
/// a random blind `r` (§3, §4.3). Tagged `0x08`/`0x09` so it can never be
/// decoded as a `Point` by mistake despite sharing the same curve
/// arithmetic.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Commitment(CurvePoint);

impl Commitment {
    pub const EVEN_TAG: u8 = 0x08;
    pub const ODD_TAG: u8 = 0x09;

    pub fn to_bytes(self) -> [u8; 33] {
        self.0.to_bytes(Self::EVEN_TAG, Self::ODD_TAG)
    }

    pub fn from_bytes(bytes: &[u8; 33]) -> Result<Self> {
        Ok(Self(CurvePoint::parse(bytes, Self::EVEN_TAG, Self::ODD_TAG)?))
    }

    pub fn add(self, other: Self) -> Self {
        Self(self.0.add(other.0))
    }

    pub fn sub(self, other: Self) -> Self {
        Self(self.0.add(other.0.mul(&(-k256::Scalar::ONE))))
    }

    pub(crate) fn inner(&self) -> CurvePoint {
        self.0
    }
}

impl core::fmt::Debug for Commitment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Commitment({})", hex::encode(self.to_bytes()))
    }
}

/// `pedersenCommit(v, r) -> r*G + v*H` (§4.1, §4.3).
pub fn pedersen_commit(value: u64, blind: &Scalar) -> Result<Commitment> {
    let value_scalar = k256::Scalar::from(value);
    let blind_scalar = to_k256(blind)?;
    let point = CurvePoint::generator()
        .mul(&blind_scalar)
        .add(pedersen_h().mul(&value_scalar));
    Ok(Commitment(point))
}

/// `pedersenCommitZeroBlind(v) -> v*H`, used for the fee output whose
/// blind is fixed at zero so its amount is publicly verifiable (§4.3).
pub fn pedersen_commit_zero_blind(value: u64) -> Commitment {
    let value_scalar = k256::Scalar::from(value);
    Commitment(pedersen_h().mul(&value_scalar))
}

/// `pedersenBlindSum(positive, negative) -> sum(positive) - sum(negative) mod n`,
/// the excess blind a transaction publishes so verifiers can check that
/// input and output commitments balance without learning any amount
/// (§4.4 multi-input MLSAG construction).
pub fn pedersen_blind_sum(positive: &[Scalar], negative: &[Scalar]) -> Result<Scalar> {
    let mut acc = k256::Scalar::ZERO;
    for s in positive {
        acc += to_k256(s)?;
    }
    for s in negative {
        acc -= to_k256(s)?;
    }
    k256_to_scalar(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn commitments_to_the_same_value_differ_by_blind() {
        let r1 = Scalar::random(&mut OsRng);
        let r2 = Scalar::random(&mut OsRng);
        let c1 = pedersen_commit(10, &r1).unwrap();
        let c2 = pedersen_commit(10, &r2).unwrap();
        assert!(c1 != c2);
    }

    #[test]
    fn sum_of_commitments_matches_commitment_of_sum_with_summed_blind() {
        let r1 = Scalar::random(&mut OsRng);
        let r2 = Scalar::random(&mut OsRng);
        let c1 = pedersen_commit(3, &r1).unwrap();
        let c2 = pedersen_commit(4, &r2).unwrap();
        let combined = c1.add(c2);

        let r_sum = pedersen_blind_sum(&[r1, r2], &[]).unwrap();
        let expected = pedersen_commit(7, &r_sum).unwrap();
        assert!(combined == expected);
    }

    #[test]
    fn zero_blind_commitment_has_no_g_component() {
        let c = pedersen_commit_zero_blind(42);
        let expected = pedersen_h().mul(&k256::Scalar::from(42u64));
        assert!(c.inner() == expected);
    }
}
