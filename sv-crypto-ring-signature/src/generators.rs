use sha2::{Digest, Sha256};
use sv_crypto_keys::CurvePoint;

/// Deterministically hashes `domain` to a curve point via try-and-increment:
/// the standard fallback technique for hash-to-curve when no dedicated
/// constant-time map is wired up, used here to build nothing-up-my-sleeve
/// generators and the key-image base point `Hp(P)`.
pub fn hash_to_point(domain: &[u8]) -> CurvePoint {
    let mut counter: u32 = 0;
    loop {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        hasher.update(counter.to_le_bytes());
        let digest: [u8; 32] = hasher.finalize().into();

        for tag in [0x02u8, 0x03u8] {
            let mut candidate = [0u8; 33];
            candidate[0] = tag;
            candidate[1..].copy_from_slice(&digest);
            if let Ok(point) = CurvePoint::parse(&candidate, 0x02, 0x03) {
                return point;
            }
        }
        counter += 1;
    }
}

/// The Pedersen commitment's second generator `H`, independent of `G`
/// under the standard discrete-log assumption (no one knows `log_G(H)`
/// because it is derived purely from a public domain-separation string).
pub fn pedersen_h() -> CurvePoint {
    hash_to_point(b"sv-confidential-tx/pedersen-generator-h")
}

/// `Hp(P)` — the key-image hash-to-point function (§4.1, §4.2): maps a
/// compressed destination public key to an independent curve point.
pub fn hash_to_point_for_key_image(pubkey_bytes: &[u8; 33]) -> CurvePoint {
    hash_to_point_with_prefix(b"sv-confidential-tx/key-image-hp", pubkey_bytes)
}

fn hash_to_point_with_prefix(prefix: &[u8], data: &[u8]) -> CurvePoint {
    let mut counter: u32 = 0;
    loop {
        let mut hasher = Sha256::new();
        hasher.update(prefix);
        hasher.update(data);
        hasher.update(counter.to_le_bytes());
        let digest: [u8; 32] = hasher.finalize().into();

        for tag in [0x02u8, 0x03u8] {
            let mut candidate = [0u8; 33];
            candidate[0] = tag;
            candidate[1..].copy_from_slice(&digest);
            if let Ok(point) = CurvePoint::parse(&candidate, 0x02, 0x03) {
                return point;
            }
        }
        counter += 1;
    }
}
