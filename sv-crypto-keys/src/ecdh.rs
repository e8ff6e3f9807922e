use crate::error::Result;
use crate::hash::{sha256, Hash};
use crate::point::{point_multiply, Point};
use crate::scalar::Scalar;

/// `ecdh(P, s) -> SHA256(compressed(s*P))`.
///
/// This is the **common ECDH** used throughout the stealth layer for the
/// shared secret between a sender's ephemeral key and a receiver's scan
/// key (§4.1, §4.2).
pub fn shared_secret(point: &Point, scalar: &Scalar) -> Result<Hash> {
    let shared_point = point_multiply(point, scalar)?;
    Ok(sha256(&shared_point.to_bytes()))
}

/// `SHA256(ecdh(P, s))` — the **double-hashed ECDH**, used exclusively as
/// the range-proof nonce (§4.3).
///
/// Kept as a distinct, separately named operation from [`shared_secret`]
/// per the redesign note in §9: the source conflated the two, which made
/// it easy to accidentally reuse a value meant for rewinding as the
/// stealth shared secret or vice versa.
pub fn rangeproof_nonce(point: &Point, scalar: &Scalar) -> Result<Hash> {
    Ok(sha256(&shared_secret(point, scalar)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::derive_pub;
    use rand::rngs::OsRng;

    #[test]
    fn ecdh_is_symmetric() {
        let a = Scalar::random(&mut OsRng);
        let b = Scalar::random(&mut OsRng);
        let pub_a = derive_pub(&a).unwrap();
        let pub_b = derive_pub(&b).unwrap();

        let shared_ab = shared_secret(&pub_b, &a).unwrap();
        let shared_ba = shared_secret(&pub_a, &b).unwrap();
        assert_eq!(shared_ab, shared_ba);
    }

    #[test]
    fn rangeproof_nonce_differs_from_shared_secret() {
        let a = Scalar::random(&mut OsRng);
        let b = Scalar::random(&mut OsRng);
        let pub_b = derive_pub(&b).unwrap();

        let shared = shared_secret(&pub_b, &a).unwrap();
        let nonce = rangeproof_nonce(&pub_b, &a).unwrap();
        assert_ne!(shared, nonce);
        assert_eq!(nonce, sha256(&shared));
    }
}
