use sha2::{Digest, Sha256};
use sha3::Keccak256;

/// A 32-byte digest, used throughout the wire format and the crypto
/// facade (§3).
pub type Hash = [u8; 32];

pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

pub fn double_sha256(data: &[u8]) -> Hash {
    sha256(&sha256(data))
}

/// `hash160` — `RIPEMD160(SHA256(data))`, used for P2PKH `scriptPubKey`
/// construction on CT outputs.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    use ripemd::Ripemd160;
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}

pub fn keccak256(data: &[u8]) -> Hash {
    use sha3::Digest as _;
    Keccak256::digest(data).into()
}
