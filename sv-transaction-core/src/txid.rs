use crate::error::Result;
use sv_crypto_keys::double_sha256;
use sv_transaction_types::Transaction;

/// `txid = reverse(doubleSha256(fullTxBytes))` (§4.5). The reversal
/// matches the RPC/display convention (§9 open question): every place
/// that prints or consumes a txid string uses this same byte order.
pub fn txid(tx: &Transaction) -> Result<[u8; 32]> {
    let bytes = tx.serialize()?;
    let mut hash = double_sha256(&bytes);
    hash.reverse();
    Ok(hash)
}

pub fn txid_hex(tx: &Transaction) -> Result<String> {
    Ok(hex::encode(txid(tx)?))
}
