use crate::address::StealthAddress;
use crate::error::Result;
use rand_core::CryptoRngCore;
use sv_crypto_keys::{derive_pub, Point, Scalar};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A wallet's full key material: the two root secrets, their public
/// counterparts, and the bech32 address that advertises them (§4.2 wallet
/// construction).
///
/// Secrets zeroize on drop; nothing here is ever written to a log (§5).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Wallet {
    pub spend_secret: Scalar,
    pub scan_secret: Scalar,
    #[zeroize(skip)]
    pub spend_pub: Point,
    #[zeroize(skip)]
    pub scan_pub: Point,
    #[zeroize(skip)]
    pub stealth_address: StealthAddress,
}

impl Wallet {
    /// `createWallet()`: samples two random non-zero scalars, derives their
    /// public counterparts, and encodes the stealth address (§4.2).
    pub fn create(rng: &mut impl CryptoRngCore) -> Result<Self> {
        let spend_secret = Scalar::random(rng);
        let scan_secret = Scalar::random(rng);
        Self::from_secrets(spend_secret, scan_secret)
    }

    /// `restoreWallet(spendHex, scanHex)`: validates and re-derives a
    /// wallet from its two raw 32-byte secrets (§4.2).
    pub fn restore(spend_hex: &str, scan_hex: &str) -> Result<Self> {
        let spend_bytes = decode_32(spend_hex)?;
        let scan_bytes = decode_32(scan_hex)?;
        let spend_secret = Scalar::from_canonical_bytes(spend_bytes)?;
        let scan_secret = Scalar::from_canonical_bytes(scan_bytes)?;
        Self::from_secrets(spend_secret, scan_secret)
    }

    fn from_secrets(spend_secret: Scalar, scan_secret: Scalar) -> Result<Self> {
        let spend_pub = derive_pub(&spend_secret)?;
        let scan_pub = derive_pub(&scan_secret)?;
        let stealth_address = StealthAddress::new(scan_pub, spend_pub);
        Ok(Self {
            spend_secret,
            scan_secret,
            spend_pub,
            scan_pub,
            stealth_address,
        })
    }

    pub fn address(&self) -> Result<String> {
        self.stealth_address.encode()
    }

    pub fn spend_hex(&self) -> String {
        hex::encode(self.spend_secret.as_bytes())
    }

    pub fn scan_hex(&self) -> String {
        hex::encode(self.scan_secret.as_bytes())
    }
}

fn decode_32(hex_str: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(hex_str).map_err(|_| sv_crypto_keys::Error::LengthMismatch(32, 0))?;
    if bytes.len() != 32 {
        return Err(sv_crypto_keys::Error::LengthMismatch(32, bytes.len()).into());
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::is_valid_address;
    use rand::rngs::OsRng;

    #[test]
    fn created_wallet_has_a_valid_address() {
        let wallet = Wallet::create(&mut OsRng).unwrap();
        let address = wallet.address().unwrap();
        assert!(address.starts_with("sv1"));
        assert!((95..=122).contains(&address.len()));
        assert!(is_valid_address(&address));
    }

    #[test]
    fn restore_reproduces_the_same_address() {
        let wallet = Wallet::create(&mut OsRng).unwrap();
        let restored = Wallet::restore(&wallet.spend_hex(), &wallet.scan_hex()).unwrap();
        assert_eq!(wallet.address().unwrap(), restored.address().unwrap());
    }
}
