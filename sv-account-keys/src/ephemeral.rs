use crate::address::StealthAddress;
use crate::error::Result;
use sv_crypto_keys::{derive_pub, point_add_scalar, private_add, shared_secret, Point, Scalar};

/// The four values a sender derives for one stealth output: an ephemeral
/// keypair and the resulting one-time destination key (§4.2 sender side).
#[derive(Debug, Clone)]
pub struct EphemeralOutput {
    pub ephemeral_secret: Scalar,
    pub ephemeral_public: Point,
    pub shared_secret: [u8; 32],
    pub dest_pub: Point,
}

/// Sender side of stealth address derivation: samples a fresh ephemeral
/// keypair, derives the ECDH shared secret with the receiver's scan key,
/// and folds it into the receiver's spend key to get a one-time
/// destination public key nobody but the receiver can link back to them
/// (§4.2).
pub fn derive_destination(address: &StealthAddress, ephemeral_secret: Scalar) -> Result<EphemeralOutput> {
    let ephemeral_public = derive_pub(&ephemeral_secret)?;
    let shared = shared_secret(&address.scan_pub, &ephemeral_secret)?;
    let shared_scalar = Scalar::from_canonical_bytes(shared)?;
    let dest_pub = point_add_scalar(&address.spend_pub, &shared_scalar)?;
    Ok(EphemeralOutput {
        ephemeral_secret,
        ephemeral_public,
        shared_secret: shared,
        dest_pub,
    })
}

/// Receiver side: recovers the one-time spend secret for an output
/// addressed to this wallet, and verifies it actually matches the
/// published destination key before the caller trusts it (§4.2 receiver
/// side, §8.5 receiver-detection soundness).
pub fn recover_destination_secret(
    ephemeral_public: &Point,
    scan_secret: &Scalar,
    spend_secret: &Scalar,
    expected_dest_pub: &Point,
) -> Result<Scalar> {
    let shared = shared_secret(ephemeral_public, scan_secret)?;
    let shared_scalar = Scalar::from_canonical_bytes(shared)?;
    let dest_secret = private_add(spend_secret, &shared_scalar)?;
    let dest_pub = derive_pub(&dest_secret)?;
    if dest_pub != *expected_dest_pub {
        return Err(sv_crypto_keys::Error::InvalidPoint.into());
    }
    Ok(dest_secret)
}

/// `deriveCTSpendKey` (§4.4 CT-input ECDSA signing path): the spend secret
/// for a CT-family output, derived the same way as `recover_destination_secret`
/// but without the destination-key equality check (CT outputs are
/// identified by scriptPubKey match, not destination-key comparison).
pub fn derive_ct_spend_key(spend_secret: &Scalar, scan_secret: &Scalar, ephemeral_public: &Point) -> Result<Scalar> {
    let shared = shared_secret(ephemeral_public, scan_secret)?;
    let shared_scalar = Scalar::from_canonical_bytes(shared)?;
    Ok(private_add(spend_secret, &shared_scalar)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn receiver_recovers_sender_destination() {
        let scan_secret = Scalar::random(&mut OsRng);
        let spend_secret = Scalar::random(&mut OsRng);
        let scan_pub = derive_pub(&scan_secret).unwrap();
        let spend_pub = derive_pub(&spend_secret).unwrap();
        let address = StealthAddress::new(scan_pub, spend_pub);

        let ephemeral_secret = Scalar::random(&mut OsRng);
        let sent = derive_destination(&address, ephemeral_secret).unwrap();

        let recovered =
            recover_destination_secret(&sent.ephemeral_public, &scan_secret, &spend_secret, &sent.dest_pub).unwrap();
        assert_eq!(derive_pub(&recovered).unwrap(), sent.dest_pub);
    }

    #[test]
    fn wrong_scan_key_does_not_match() {
        let scan_secret = Scalar::random(&mut OsRng);
        let spend_secret = Scalar::random(&mut OsRng);
        let scan_pub = derive_pub(&scan_secret).unwrap();
        let spend_pub = derive_pub(&spend_secret).unwrap();
        let address = StealthAddress::new(scan_pub, spend_pub);

        let sent = derive_destination(&address, Scalar::random(&mut OsRng)).unwrap();

        let wrong_scan = Scalar::random(&mut OsRng);
        assert!(recover_destination_secret(&sent.ephemeral_public, &wrong_scan, &spend_secret, &sent.dest_pub).is_err());
    }
}
