//! Advance the wallet's watch-only scan position (§4.7 paginated scan).

use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;
use sv_account_keys::Wallet;
use sv_ledger_sync::{get_balance, get_balance_ct, BalanceOptions};
use sv_rpc::{RpcClient, RpcConfig};

use crate::storage::EncryptedWallet;

use super::balance::format_amount;
use super::{decrypt_wallet_with_rate_limiting, print_error, print_success};

pub async fn run(wallet_path: &Path, rpc_config: &RpcConfig, full: bool) -> Result<()> {
    if !EncryptedWallet::exists(wallet_path) {
        print_error("No wallet found. Run 'sv-wallet init' first.");
        return Ok(());
    }

    let (mut stored, secrets, _password) = decrypt_wallet_with_rate_limiting(wallet_path)?;
    let account = Wallet::restore(&secrets.spend_hex(), &secrets.scan_hex())?;
    let rpc = RpcClient::new(rpc_config.clone())?;

    if full {
        println!("Performing full rescan from the beginning of both watch-only streams...");
        stored.last_anon_index = 0;
        stored.last_ct_index = 0;
        stored.spent_key_images.clear();
        stored.known_ct_outpoints.clear();
    } else if stored.last_anon_index == 0 && stored.last_ct_index == 0 {
        println!("Performing initial sync...");
    } else {
        println!(
            "Resuming sync from RingCT index {} / CT index {}...",
            stored.last_anon_index, stored.last_ct_index
        );
    }

    let mut discovered = 0u64;
    let known_spent: HashSet<[u8; 33]> = stored
        .spent_key_images
        .iter()
        .filter_map(|hex_str| hex::decode(hex_str).ok())
        .filter_map(|bytes| bytes.try_into().ok())
        .collect();

    let mut count_sink = |batch: &[sv_transaction_types::UtxoRingCt]| {
        discovered += batch.len() as u64;
    };
    let ringct_report = get_balance(
        &account,
        &rpc,
        BalanceOptions {
            known_spent_key_images: known_spent,
            start_index: stored.last_anon_index,
            on_utxo_discovered: Some(&mut count_sink),
            ..BalanceOptions::default()
        },
    )
    .await?;

    let known_outpoints: HashSet<([u8; 32], u32)> = stored
        .known_ct_outpoints
        .iter()
        .filter_map(|(txid_hex, vout)| {
            let bytes = hex::decode(txid_hex).ok()?;
            let arr: [u8; 32] = bytes.try_into().ok()?;
            Some((arr, *vout))
        })
        .collect();
    let ct_report = get_balance_ct(&account, &rpc, stored.last_ct_index, known_outpoints).await?;

    stored.last_anon_index = ringct_report.last_processed_index;
    stored.last_ct_index = ct_report.last_processed_index;
    stored.spent_key_images = ringct_report.spent_key_images.iter().map(hex::encode).collect();
    stored.known_ct_outpoints = ct_report
        .known_outpoints
        .iter()
        .map(|(txid, vout)| (hex::encode(txid), *vout))
        .collect();
    stored.save(wallet_path)?;

    println!();
    print_success("Sync complete!");
    println!("RingCT outputs scanned: {}", ringct_report.total_outputs_scanned);
    println!("CT outputs scanned:     {}", ct_report.total_outputs_scanned);
    println!("New RingCT UTXOs:       {}", discovered);
    println!("New CT UTXOs:           {}", ct_report.owned_outputs_found);
    println!("Total balance:          {}", format_amount(ringct_report.total_balance + ct_report.total_balance));

    Ok(())
}
