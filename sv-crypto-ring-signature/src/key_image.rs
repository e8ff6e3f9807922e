use crate::error::Result;
use crate::generators::hash_to_point_for_key_image;
use crate::scalar_ext::to_k256;
use sv_crypto_keys::{CurvePoint, Point, Scalar};

/// `I = x * Hp(P)` — the double-spend tag bound to a one-time spend key,
/// linkable across transactions without revealing which ring member spent
/// (§4.1, §4.4).
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct KeyImage(CurvePoint);

impl KeyImage {
    pub const EVEN_TAG: u8 = 0x02;
    pub const ODD_TAG: u8 = 0x03;

    /// Computes the key image for a one-time private key `x` whose public
    /// counterpart is `pubkey`.
    pub fn compute(spend_priv: &Scalar, pubkey: &Point) -> Result<Self> {
        let hp = hash_to_point_for_key_image(&pubkey.to_bytes());
        let scalar = to_k256(spend_priv)?;
        Ok(Self(hp.mul(&scalar)))
    }

    pub fn to_bytes(self) -> [u8; 33] {
        self.0.to_bytes(Self::EVEN_TAG, Self::ODD_TAG)
    }

    pub fn from_bytes(bytes: &[u8; 33]) -> Result<Self> {
        Ok(Self(CurvePoint::parse(bytes, Self::EVEN_TAG, Self::ODD_TAG)?))
    }
}

impl core::fmt::Debug for KeyImage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "KeyImage({})", hex::encode(self.to_bytes()))
    }
}
