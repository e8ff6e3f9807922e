//! Paginated balance aggregation (§4.7): drives `getwatchonlytxes`,
//! filters spent outputs via `checkkeyimages`, and streams newly
//! discovered UTXOs to a caller-supplied sink.
//!
//! Single-threaded and strictly sequential by construction: each page is
//! awaited before the next is requested, which is what keeps
//! `last_processed_index` monotonic across resumed scans.

use crate::detect::{detect_ct_output, detect_ringct_output, RewindOverride};
use crate::error::Result;
use crate::watch_only::{RecordPayload, WatchOnlyRecord};
use std::collections::HashSet;
use sv_account_keys::Wallet;
use sv_crypto_ring_signature::KeyImage;
use sv_rpc::{methods, RpcClient};
use sv_transaction_types::{UtxoCt, UtxoRingCt};

const PAGE_SIZE: usize = 1000;

/// Options for one [`get_balance`] call.
pub struct BalanceOptions<'a> {
    pub known_spent_key_images: HashSet<[u8; 33]>,
    pub start_index: u64,
    pub batch_size: usize,
    pub on_utxo_discovered: Option<&'a mut dyn FnMut(&[UtxoRingCt])>,
}

impl Default for BalanceOptions<'_> {
    fn default() -> Self {
        Self {
            known_spent_key_images: HashSet::new(),
            start_index: 0,
            batch_size: PAGE_SIZE,
            on_utxo_discovered: None,
        }
    }
}

/// Result of a `getBalance` scan (§4.7).
pub struct BalanceReport {
    pub total_balance: u64,
    pub utxos: Vec<UtxoRingCt>,
    pub last_processed_index: u64,
    pub spent_key_images: HashSet<[u8; 33]>,
    pub total_outputs_scanned: u64,
    pub owned_outputs_found: u64,
}

/// Scans the RingCT (`anon`) watch-only stream for `wallet`'s outputs,
/// paginating `getwatchonlytxes` until a page returns fewer than 1000
/// records.
pub async fn get_balance(wallet: &Wallet, rpc: &RpcClient, mut options: BalanceOptions<'_>) -> Result<BalanceReport> {
    let scan_hex = hex::encode(wallet.scan_secret.as_bytes());
    let mut current_index = options.start_index;
    let mut spent_key_images = std::mem::take(&mut options.known_spent_key_images);
    let mut unspent = Vec::new();
    let mut total_balance = 0u64;
    let mut total_outputs_scanned = 0u64;
    let mut owned_outputs_found = 0u64;
    let mut last_processed_index = current_index;

    loop {
        let page = methods::get_watch_only_txes(rpc, &scan_hex, current_index).await?;
        let page_len = page.anon.len();
        total_outputs_scanned += page_len as u64;

        let mut candidates = Vec::with_capacity(page_len);
        let mut last_dbindex = None;
        for raw in &page.anon {
            last_dbindex = Some(raw.dbindex);
            let record = WatchOnlyRecord::parse(&hex::decode(&raw.raw).map_err(|_| crate::error::Error::InvalidHex {
                field: "raw",
            })?)?;
            let RecordPayload::Anon(payload) = &record.payload else {
                continue;
            };
            let rpc_blind = raw
                .blind
                .as_deref()
                .map(|hex_str| decode_blind(hex_str))
                .transpose()?;
            let overrides = RewindOverride {
                amount: raw.amount,
                blind: rpc_blind,
            };
            if let Some(utxo) =
                detect_ringct_output(wallet, payload, record.tx_hash, record.tx_index, record.ringct_index, overrides)?
            {
                candidates.push(utxo);
            }
        }
        owned_outputs_found += candidates.len() as u64;

        let unknown: Vec<KeyImage> = candidates
            .iter()
            .filter(|u| !spent_key_images.contains(&u.key_image.to_bytes()))
            .map(|u| u.key_image)
            .collect();

        if !unknown.is_empty() {
            for batch in unknown.chunks(options.batch_size.max(1)) {
                let statuses = methods::check_key_images(rpc, batch).await?;
                for (image, status) in batch.iter().zip(statuses.iter()) {
                    if status.spent || status.spentinmempool {
                        spent_key_images.insert(image.to_bytes());
                    }
                }
            }
        }

        let mut page_batch = Vec::new();
        for utxo in candidates {
            if spent_key_images.contains(&utxo.key_image.to_bytes()) {
                continue;
            }
            total_balance += utxo.amount;
            page_batch.push(utxo);
        }
        if let Some(sink) = options.on_utxo_discovered.as_mut() {
            sink(&page_batch);
        }
        unspent.extend(page_batch);

        if let Some(dbindex) = last_dbindex {
            last_processed_index = dbindex + 1;
        }
        if page_len < PAGE_SIZE {
            break;
        }
        current_index = last_processed_index;
    }

    Ok(BalanceReport {
        total_balance,
        utxos: unspent,
        last_processed_index,
        spent_key_images,
        total_outputs_scanned,
        owned_outputs_found,
    })
}

/// Result of a `getBalanceCT` scan: same shape as [`BalanceReport`] but
/// spent status is cached by `(txid, vout)` outpoint, since no
/// cross-check RPC exists for CT spend status.
pub struct BalanceCtReport {
    pub total_balance: u64,
    pub utxos: Vec<UtxoCt>,
    pub last_processed_index: u64,
    pub known_outpoints: HashSet<([u8; 32], u32)>,
    pub total_outputs_scanned: u64,
    pub owned_outputs_found: u64,
}

pub async fn get_balance_ct(
    wallet: &Wallet,
    rpc: &RpcClient,
    start_index: u64,
    mut known_outpoints: HashSet<([u8; 32], u32)>,
) -> Result<BalanceCtReport> {
    let scan_hex = hex::encode(wallet.scan_secret.as_bytes());
    let mut current_index = start_index;
    let mut unspent = Vec::new();
    let mut total_balance = 0u64;
    let mut total_outputs_scanned = 0u64;
    let mut owned_outputs_found = 0u64;
    let mut last_processed_index = current_index;

    loop {
        let page = methods::get_watch_only_txes(rpc, &scan_hex, current_index).await?;
        let page_len = page.stealth.len();
        total_outputs_scanned += page_len as u64;

        let mut last_dbindex = None;
        for raw in &page.stealth {
            last_dbindex = Some(raw.dbindex);
            let record = WatchOnlyRecord::parse(&hex::decode(&raw.raw).map_err(|_| crate::error::Error::InvalidHex {
                field: "raw",
            })?)?;
            let RecordPayload::Stealth(payload) = &record.payload else {
                continue;
            };
            let rpc_blind = raw
                .blind
                .as_deref()
                .map(|hex_str| decode_blind(hex_str))
                .transpose()?;
            let overrides = RewindOverride {
                amount: raw.amount,
                blind: rpc_blind,
            };
            let Some(utxo) = detect_ct_output(wallet, payload, record.tx_hash, record.tx_index, overrides)? else {
                continue;
            };
            owned_outputs_found += 1;
            let outpoint = (utxo.txid, utxo.vout);
            if known_outpoints.contains(&outpoint) {
                continue;
            }
            known_outpoints.insert(outpoint);
            total_balance += utxo.amount;
            unspent.push(utxo);
        }

        if let Some(dbindex) = last_dbindex {
            last_processed_index = dbindex + 1;
        }
        if page_len < PAGE_SIZE {
            break;
        }
        current_index = last_processed_index;
    }

    Ok(BalanceCtReport {
        total_balance,
        utxos: unspent,
        last_processed_index,
        known_outpoints,
        total_outputs_scanned,
        owned_outputs_found,
    })
}

fn decode_blind(hex_str: &str) -> Result<sv_crypto_keys::Scalar> {
    let raw = hex::decode(hex_str).map_err(|_| crate::error::Error::InvalidHex { field: "blind" })?;
    let arr: [u8; 32] = raw
        .try_into()
        .map_err(|_| crate::error::Error::InvalidHex { field: "blind" })?;
    Ok(sv_crypto_keys::Scalar::from_canonical_bytes(arr)?)
}
