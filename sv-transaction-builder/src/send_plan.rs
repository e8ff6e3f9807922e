use crate::coin_selection::{select_coins, MAX_INPUTS};
use crate::error::{Error, Result};
use rand::Rng;
use sv_transaction_types::UtxoRingCt;

/// One sub-transaction in a [`SendPlan`]. Non-final batches are
/// consolidations: they merge up to [`MAX_INPUTS`] UTXOs into a single
/// change-like self-send with no external recipient, freeing up a single
/// spendable UTXO for the next stage. The final batch pays the actual
/// recipient from whatever the consolidation stages produced.
#[derive(Debug, Clone)]
pub struct SendBatch {
    pub utxos: Vec<UtxoRingCt>,
    pub amount: u64,
    pub fee: u64,
    pub is_final: bool,
}

#[derive(Debug, Clone)]
pub struct SendPlan {
    pub batches: Vec<SendBatch>,
    pub total_fee: u64,
}

/// Plans a send that plain coin selection cannot satisfy within the
/// 32-input hard limit (§7 "send-wrapper multi-transaction planning"):
/// rather than failing outright with `TooManyInputs`, consolidates the
/// wallet's UTXOs [`MAX_INPUTS`] at a time into successive self-sends and
/// then pays the recipient from the consolidated proceeds. Falls through
/// to plain [`select_coins`] when the send fits in one transaction.
pub fn plan_send(
    utxos: &[UtxoRingCt],
    target: u64,
    fee_per_kb: u64,
    ring_size: usize,
    n_outputs: usize,
    rng: &mut impl Rng,
) -> Result<SendPlan> {
    match select_coins(utxos, target, fee_per_kb, ring_size, n_outputs, rng) {
        Ok(selection) => Ok(SendPlan {
            batches: vec![SendBatch {
                utxos: selection.selected,
                amount: target,
                fee: selection.fee,
                is_final: true,
            }],
            total_fee: selection.fee,
        }),
        Err(Error::TooManyInputs(_)) => consolidate_then_send(utxos, target, fee_per_kb, ring_size, n_outputs),
        Err(e) => Err(e),
    }
}

fn consolidate_then_send(
    utxos: &[UtxoRingCt],
    target: u64,
    fee_per_kb: u64,
    ring_size: usize,
    n_outputs: usize,
) -> Result<SendPlan> {
    let mut batches = Vec::new();
    let mut total_fee = 0u64;
    let mut consolidated_amounts = Vec::new();

    for chunk in utxos.chunks(MAX_INPUTS) {
        let sum: u64 = chunk.iter().map(|u| u.amount).sum();
        // One consolidated RingCT output per batch, no separate recipient.
        let size = 100 + chunk.len() * (ring_size * 33 + 100) + 156;
        let fee = (size as u64).div_ceil(1000) * fee_per_kb;
        if sum <= fee {
            continue;
        }
        let amount = sum - fee;
        total_fee += fee;
        consolidated_amounts.push(amount);
        batches.push(SendBatch {
            utxos: chunk.to_vec(),
            amount,
            fee,
            is_final: false,
        });
    }

    let consolidated_total: u64 = consolidated_amounts.iter().sum();
    let final_inputs = consolidated_amounts.len().min(MAX_INPUTS);
    let final_size = 100 + final_inputs * (ring_size * 33 + 100) + n_outputs * 156;
    let final_fee = (final_size as u64).div_ceil(1000) * fee_per_kb;

    if consolidated_total < target.saturating_add(final_fee) {
        return Err(Error::InsufficientFunds {
            needed: target.saturating_add(final_fee),
            available: consolidated_total,
        });
    }
    total_fee += final_fee;

    // The final batch's inputs are the consolidation outputs, which don't
    // exist as spendable UTXOs until their batches confirm on-chain — the
    // caller re-scans and resubmits this stage once they have.
    batches.push(SendBatch {
        utxos: Vec::new(),
        amount: target,
        fee: final_fee,
        is_final: true,
    });

    Ok(SendPlan { batches, total_fee })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use sv_crypto_keys::{derive_pub, Scalar};
    use sv_crypto_ring_signature::{pedersen_commit, KeyImage};

    fn utxo(amount: u64, ringct_index: u64) -> UtxoRingCt {
        let sk = Scalar::random(&mut OsRng);
        let pubkey = derive_pub(&sk).unwrap();
        let blind = Scalar::random(&mut OsRng);
        let commitment = pedersen_commit(amount, &blind).unwrap();
        let key_image = KeyImage::compute(&sk, &pubkey).unwrap();
        UtxoRingCt {
            txid: [0u8; 32],
            vout: 0,
            pubkey,
            commitment,
            amount,
            blind,
            dest_secret: sk,
            key_image,
            ringct_index,
            spent: false,
        }
    }

    #[test]
    fn fits_in_one_batch_when_under_the_input_limit() {
        let utxos = vec![utxo(5_000_000_000, 1)];
        let plan = plan_send(&utxos, 1_000_000_000, 1000, 11, 3, &mut OsRng).unwrap();
        assert_eq!(plan.batches.len(), 1);
        assert!(plan.batches[0].is_final);
    }

    #[test]
    fn splits_into_consolidation_batches_when_too_fragmented() {
        let utxos: Vec<UtxoRingCt> = (0..70).map(|i| utxo(100_000_000, i)).collect();
        let plan = plan_send(&utxos, 5_000_000_000, 1000, 11, 3, &mut OsRng).unwrap();
        assert!(plan.batches.len() > 1);
        assert!(plan.batches.last().unwrap().is_final);
        assert!(plan.batches.iter().rev().skip(1).all(|b| !b.is_final));
    }
}
