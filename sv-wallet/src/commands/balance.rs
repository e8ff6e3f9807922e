//! Scan the watch-only streams and report the current balance (§4.7).

use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;
use sv_account_keys::Wallet;
use sv_ledger_sync::{get_balance, get_balance_ct, BalanceOptions};
use sv_rpc::{RpcClient, RpcConfig};
use sv_transaction_builder::wallet_health;

use crate::storage::EncryptedWallet;

use super::{decrypt_wallet_with_rate_limiting, print_success};

pub fn format_amount(units: u64) -> String {
    format!("{}.{:08}", units / 100_000_000, units % 100_000_000)
}

pub async fn run(wallet_path: &Path, rpc_config: &RpcConfig) -> Result<()> {
    if !EncryptedWallet::exists(wallet_path) {
        super::print_error("No wallet found. Run 'sv-wallet init' first.");
        return Ok(());
    }

    let (mut stored, secrets, _password) = decrypt_wallet_with_rate_limiting(wallet_path)?;
    let account = Wallet::restore(&secrets.spend_hex(), &secrets.scan_hex())?;
    let rpc = RpcClient::new(rpc_config.clone())?;

    println!();
    println!("Scanning RingCT outputs...");
    let known_spent: HashSet<[u8; 33]> = stored
        .spent_key_images
        .iter()
        .filter_map(|hex_str| hex::decode(hex_str).ok())
        .filter_map(|bytes| bytes.try_into().ok())
        .collect();

    let ringct_report = get_balance(
        &account,
        &rpc,
        BalanceOptions {
            known_spent_key_images: known_spent,
            start_index: stored.last_anon_index,
            ..BalanceOptions::default()
        },
    )
    .await?;

    println!("Scanning CT outputs...");
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
    stored.spent_key_images = ringct_report
        .spent_key_images
        .iter()
        .map(hex::encode)
        .collect();
    stored.known_ct_outpoints = ct_report
        .known_outpoints
        .iter()
        .map(|(txid, vout)| (hex::encode(txid), *vout))
        .collect();
    stored.save(wallet_path)?;

    let total = ringct_report.total_balance + ct_report.total_balance;
    let health = wallet_health(ringct_report.utxos.len());

    println!();
    print_success("Scan complete!");
    println!();
    println!("RingCT balance: {} ({} UTXOs)", format_amount(ringct_report.total_balance), ringct_report.utxos.len());
    println!("CT balance:     {} ({} UTXOs)", format_amount(ct_report.total_balance), ct_report.utxos.len());
    println!("Total balance:  {}", format_amount(total));
    println!("Wallet health:  {:?}", health);

    Ok(())
}
