//! Per-output receiver detection: does this wallet own the output the
//! record describes, and if so, what is its plaintext amount and blind?

use crate::error::{Error, Result};
use crate::watch_only::{CtPayload, RingctPayload};
use sv_account_keys::{derive_ct_spend_key, recover_destination_secret, Wallet};
use sv_crypto_keys::{rangeproof_nonce, shared_secret, Point, Scalar};
use sv_crypto_ring_signature::{pedersen_commit, select_params, KeyImage, RangeProof};
use sv_transaction_types::{UtxoCt, UtxoRingCt};

/// Amount/blind supplied by the node out-of-band, used in place of a
/// failed rewind (§4.6 "metadata provided by RPC may override rewind
/// results").
#[derive(Debug, Clone, Default)]
pub struct RewindOverride {
    pub amount: Option<u64>,
    pub blind: Option<Scalar>,
}

fn ephemeral_pub_from_vdata(v_data: &[u8]) -> Result<Point> {
    let raw: [u8; 33] = v_data
        .get(0..33)
        .ok_or(Error::TruncatedRecord { needed: 33, got: v_data.len() })?
        .try_into()
        .unwrap();
    Ok(Point::from_bytes(&raw)?)
}

/// Attempts to recover `(value, blind)` from a range proof, preferring the
/// RPC override when the rewind's own reconstructed commitment does not
/// match what is on the wire.
fn rewind_or_override(
    range_proof: &[u8],
    commitment: &sv_crypto_ring_signature::Commitment,
    nonce: &[u8; 32],
    rpc: RewindOverride,
) -> Result<Option<(u64, Scalar)>> {
    let proof = RangeProof::from_bytes(range_proof)?;
    if let Ok((value, blind)) = proof.rewind_with_blind(nonce) {
        if pedersen_commit(value, &blind)? == *commitment {
            return Ok(Some((value, blind)));
        }
    }
    if let (Some(amount), Some(blind)) = (rpc.amount, rpc.blind) {
        return Ok(Some((amount, blind)));
    }
    Ok(None)
}

/// Tests ownership of one ANON-record output against `wallet` and, if
/// owned, materializes it into a spendable [`UtxoRingCt`]. Returns `None`
/// for outputs addressed to someone else.
pub fn detect_ringct_output(
    wallet: &Wallet,
    payload: &RingctPayload,
    tx_hash: [u8; 32],
    vout: u32,
    ringct_index: u64,
    rpc: RewindOverride,
) -> Result<Option<UtxoRingCt>> {
    let ephemeral_pub = ephemeral_pub_from_vdata(&payload.v_data)?;

    let dest_secret = match recover_destination_secret(
        &ephemeral_pub,
        &wallet.scan_secret,
        &wallet.spend_secret,
        &payload.pubkey,
    ) {
        Ok(secret) => secret,
        Err(_) => return Ok(None),
    };

    let nonce = rangeproof_nonce(&ephemeral_pub, &dest_secret)?;
    let Some((amount, blind)) = rewind_or_override(&payload.range_proof, &payload.commitment, &nonce, rpc)? else {
        return Ok(None);
    };

    let key_image = KeyImage::compute(&dest_secret, &payload.pubkey)?;

    Ok(Some(UtxoRingCt {
        txid: tx_hash,
        vout,
        pubkey: payload.pubkey,
        commitment: payload.commitment,
        amount,
        blind,
        dest_secret,
        key_image,
        ringct_index,
        spent: false,
    }))
}

/// Tests ownership of one STEALTH-record output against `wallet` and, if
/// owned, materializes it into a spendable [`UtxoCt`]. CT ownership has no
/// destination-key comparison: a successful rewind against the single-
/// hashed ECDH shared secret is itself the ownership proof.
pub fn detect_ct_output(
    wallet: &Wallet,
    payload: &CtPayload,
    tx_hash: [u8; 32],
    vout: u32,
    rpc: RewindOverride,
) -> Result<Option<UtxoCt>> {
    let ephemeral_pub = ephemeral_pub_from_vdata(&payload.v_data)?;
    let nonce = shared_secret(&ephemeral_pub, &wallet.scan_secret)?;

    let Some((amount, blind)) = rewind_or_override(&payload.range_proof, &payload.commitment, &nonce, rpc)? else {
        return Ok(None);
    };

    let dest_secret = derive_ct_spend_key(&wallet.spend_secret, &wallet.scan_secret, &ephemeral_pub)?;
    let pubkey = sv_crypto_keys::derive_pub(&dest_secret)?;

    Ok(Some(UtxoCt {
        txid: tx_hash,
        vout,
        pubkey,
        commitment: payload.commitment,
        amount,
        blind,
        dest_secret,
        script_pubkey: payload.script_pubkey.clone(),
        spent: false,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use sv_account_keys::derive_destination;

    #[test]
    fn owner_recovers_ringct_output() {
        let wallet = Wallet::create(&mut OsRng).unwrap();
        let ephemeral_secret = Scalar::random(&mut OsRng);
        let ephemeral = derive_destination(&wallet.stealth_address, ephemeral_secret).unwrap();

        let blind = Scalar::random(&mut OsRng);
        let value = 4_200u64;
        let commitment = pedersen_commit(value, &blind).unwrap();
        let sender_nonce = rangeproof_nonce(&ephemeral.dest_pub, &ephemeral_secret).unwrap();
        let proof = RangeProof::sign(value, &blind, &sender_nonce, select_params(value)).unwrap();

        let payload = RingctPayload {
            pubkey: ephemeral.dest_pub,
            commitment,
            v_data: ephemeral.ephemeral_public.to_bytes().to_vec(),
            range_proof: proof.to_bytes(),
        };

        let utxo = detect_ringct_output(&wallet, &payload, [1u8; 32], 0, 9, RewindOverride::default())
            .unwrap()
            .expect("output should be owned");
        assert_eq!(utxo.amount, value);
        assert_eq!(utxo.blind.as_bytes(), blind.as_bytes());
    }

    #[test]
    fn stranger_wallet_does_not_recover_output() {
        let wallet = Wallet::create(&mut OsRng).unwrap();
        let stranger = Wallet::create(&mut OsRng).unwrap();
        let ephemeral_secret = Scalar::random(&mut OsRng);
        let ephemeral = derive_destination(&wallet.stealth_address, ephemeral_secret).unwrap();

        let blind = Scalar::random(&mut OsRng);
        let value = 10u64;
        let commitment = pedersen_commit(value, &blind).unwrap();
        let sender_nonce = rangeproof_nonce(&ephemeral.dest_pub, &ephemeral_secret).unwrap();
        let proof = RangeProof::sign(value, &blind, &sender_nonce, select_params(value)).unwrap();

        let payload = RingctPayload {
            pubkey: ephemeral.dest_pub,
            commitment,
            v_data: ephemeral.ephemeral_public.to_bytes().to_vec(),
            range_proof: proof.to_bytes(),
        };

        let result = detect_ringct_output(&stranger, &payload, [1u8; 32], 0, 9, RewindOverride::default()).unwrap();
        assert!(result.is_none());
    }
}
