use sv_crypto_keys::{Point, Scalar};
use sv_crypto_ring_signature::{Commitment, KeyImage};

/// An owned, spendable RingCT output (§3 "UTXO (RingCT)").
///
/// Invariants upheld by whoever constructs one (the watch-only parser,
/// §4.6): `commitment == pedersenCommit(amount, blind)`;
/// `derivePub(dest_secret) == pubkey`; `key_image` is deterministic from
/// `pubkey` and `dest_secret`; `ringct_index` is the output's globally
/// monotonic blockchain index.
#[derive(Debug, Clone)]
pub struct UtxoRingCt {
    pub txid: [u8; 32],
    pub vout: u32,
    pub pubkey: Point,
    pub commitment: Commitment,
    pub amount: u64,
    pub blind: Scalar,
    pub dest_secret: Scalar,
    pub key_image: KeyImage,
    pub ringct_index: u64,
    pub spent: bool,
}

/// An owned, spendable CT output (§3 "UTXO (CT)"): same shape as
/// [`UtxoRingCt`] but spend status is tracked by outpoint, not key image,
/// and it carries a P2PKH `script_pubkey` instead of a ring index.
#[derive(Debug, Clone)]
pub struct UtxoCt {
    pub txid: [u8; 32],
    pub vout: u32,
    pub pubkey: Point,
    pub commitment: Commitment,
    pub amount: u64,
    pub blind: Scalar,
    pub dest_secret: Scalar,
    pub script_pubkey: Vec<u8>,
    pub spent: bool,
}
