use crate::error::{Error, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use sv_transaction_types::UtxoRingCt;

/// Hard consensus-like cap on real inputs per transaction (§4.4, §7).
pub const MAX_INPUTS: usize = 32;

/// UTXO count at or above which a wallet is considered fragmented enough
/// to warrant consolidation (§7 "wallet-health grades").
pub const CONSOLIDATION_THRESHOLD: usize = 10;

#[derive(Debug, Clone)]
pub struct CoinSelection {
    pub selected: Vec<UtxoRingCt>,
    pub fee: u64,
    pub total_selected: u64,
}

/// Coin selection (§4.4): shuffles the candidate UTXOs with a
/// cryptographic RNG, then accumulates from that randomized order,
/// re-estimating the transaction's byte size and fee after every
/// addition, until the running total covers `target + fee`.
///
/// `n_outputs` is the number of outputs the finished transaction will
/// carry (recipients + fee + change) — known to the caller before
/// selection starts since the fee estimate only needs output *count*,
/// not content. The `100 + nIn*(ringSize*33+100) + nOut*156` estimate is
/// an upper bound (§9): it does not shrink as the real serialized size
/// becomes known, so the final transaction is never underfunded.
pub fn select_coins(
    utxos: &[UtxoRingCt],
    target: u64,
    fee_per_kb: u64,
    ring_size: usize,
    n_outputs: usize,
    rng: &mut impl Rng,
) -> Result<CoinSelection> {
    if !(3..=32).contains(&ring_size) {
        return Err(Error::InvalidRingSize(ring_size));
    }

    let mut order: Vec<usize> = (0..utxos.len()).collect();
    order.shuffle(rng);

    let mut selected_idx: Vec<usize> = Vec::new();
    let mut total = 0u64;
    let mut fee = 0u64;

    for idx in order {
        if selected_idx.len() >= MAX_INPUTS {
            return Err(Error::TooManyInputs(selected_idx.len() + 1));
        }
        selected_idx.push(idx);
        total = total.saturating_add(utxos[idx].amount);

        let n_in = selected_idx.len();
        let size = 100 + n_in * (ring_size * 33 + 100) + n_outputs * 156;
        fee = size.div_ceil(1000) as u64 * fee_per_kb;

        if total >= target.saturating_add(fee) {
            let selected = selected_idx.into_iter().map(|i| utxos[i].clone()).collect();
            tracing::debug!(n_in, fee, total, "coin selection converged");
            return Ok(CoinSelection {
                selected,
                fee,
                total_selected: total,
            });
        }
    }

    Err(Error::InsufficientFunds {
        needed: target.saturating_add(fee),
        available: total,
    })
}

/// Wallet-health grade derived from UTXO count relative to the
/// consolidation threshold and the hard input limit (§7).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum WalletHealth {
    Healthy,
    Fragmented,
    Critical,
}

pub fn wallet_health(utxo_count: usize) -> WalletHealth {
    if utxo_count >= MAX_INPUTS {
        WalletHealth::Critical
    } else if utxo_count >= CONSOLIDATION_THRESHOLD {
        WalletHealth::Fragmented
    } else {
        WalletHealth::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use sv_crypto_keys::{derive_pub, Scalar};
    use sv_crypto_ring_signature::{pedersen_commit, KeyImage};

    fn sample_utxo(amount: u64) -> UtxoRingCt {
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
            ringct_index: 0,
            spent: false,
        }
    }

    #[test]
    fn selects_enough_utxos_to_cover_target_and_fee() {
        let utxos = vec![sample_utxo(1_000_000_000), sample_utxo(2_000_000_000)];
        let selection = select_coins(&utxos, 1_000_000_000, 1000, 11, 3, &mut OsRng).unwrap();
        assert!(selection.total_selected >= 1_000_000_000 + selection.fee);
    }

    #[test]
    fn fails_with_insufficient_funds() {
        let utxos = vec![sample_utxo(10)];
        let err = select_coins(&utxos, 1_000_000_000, 1000, 11, 3, &mut OsRng).unwrap_err();
        assert!(matches!(err, Error::InsufficientFunds { .. }));
    }

    #[test]
    fn fails_with_too_many_inputs_when_dust_requires_more_than_32() {
        let utxos: Vec<UtxoRingCt> = (0..40).map(|_| sample_utxo(1)).collect();
        let err = select_coins(&utxos, 1_000_000, 1000, 11, 3, &mut OsRng).unwrap_err();
        assert!(matches!(err, Error::TooManyInputs(_)));
    }

    #[test]
    fn rejects_ring_size_outside_bounds() {
        let utxos = vec![sample_utxo(100)];
        assert!(select_coins(&utxos, 1, 1, 2, 3, &mut OsRng).is_err());
        assert!(select_coins(&utxos, 1, 1, 33, 3, &mut OsRng).is_err());
    }

    #[test]
    fn wallet_health_grades() {
        assert_eq!(wallet_health(3), WalletHealth::Healthy);
        assert_eq!(wallet_health(10), WalletHealth::Fragmented);
        assert_eq!(wallet_health(32), WalletHealth::Critical);
    }
}
