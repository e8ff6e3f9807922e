use crate::error::{Error, Result};
use crate::scalar::Scalar;
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{Signature, SigningKey};

fn signing_key(sk: &Scalar) -> Result<SigningKey> {
    SigningKey::from_bytes(sk.as_bytes().into()).map_err(|_| Error::InvalidScalar)
}

/// `ecdsaSign(hash, sk) -> derSig` — DER-encoded ECDSA signature over a
/// 32-byte prehash, used for the legacy CT sighash (§4.4, §4.5).
pub fn ecdsa_sign(hash: &[u8; 32], sk: &Scalar) -> Result<Vec<u8>> {
    let signing_key = signing_key(sk)?;
    let signature: Signature = signing_key
        .sign_prehash(hash)
        .map_err(|_| Error::SigningFailed)?;
    Ok(signature.to_der().as_bytes().to_vec())
}

/// `ecdsaSignCompact(hash, sk) -> 64B` — raw `r || s` signature, without
/// DER framing or a recovery byte.
pub fn ecdsa_sign_compact(hash: &[u8; 32], sk: &Scalar) -> Result<[u8; 64]> {
    let signing_key = signing_key(sk)?;
    let signature: Signature = signing_key
        .sign_prehash(hash)
        .map_err(|_| Error::SigningFailed)?;
    let mut out = [0u8; 64];
    out.copy_from_slice(&signature.to_bytes());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256;
    use rand::rngs::OsRng;

    #[test]
    fn compact_signature_is_64_bytes_and_verifies() {
        use k256::ecdsa::signature::hazmat::PrehashVerifier;
        use k256::ecdsa::VerifyingKey;

        let sk = Scalar::random(&mut OsRng);
        let hash = sha256(b"legacy sighash preimage");
        let sig_bytes = ecdsa_sign_compact(&hash, &sk).unwrap();
        let signature = Signature::from_slice(&sig_bytes).unwrap();

        let signing_key = signing_key(&sk).unwrap();
        let verifying_key = VerifyingKey::from(&signing_key);
        assert!(verifying_key.verify_prehash(&hash, &signature).is_ok());
    }
}
