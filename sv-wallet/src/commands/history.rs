//! List known UTXOs and the wallet's health grading (§7 wallet-health grades).
//!
//! Rescans both watch-only streams from the beginning rather than reusing
//! the saved scan position, since (unlike `balance`/`sync`) this command
//! needs every individual UTXO, not just the running totals.

use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;
use sv_account_keys::Wallet;
use sv_ledger_sync::{get_balance, get_balance_ct, BalanceOptions};
use sv_rpc::{RpcClient, RpcConfig};
use sv_transaction_builder::wallet_health;

use crate::storage::EncryptedWallet;

use super::balance::format_amount;
use super::{decrypt_wallet_with_rate_limiting, print_error};

pub async fn run(wallet_path: &Path, rpc_config: &RpcConfig) -> Result<()> {
    if !EncryptedWallet::exists(wallet_path) {
        print_error("No wallet found. Run 'sv-wallet init' first.");
        return Ok(());
    }

    let (_stored, secrets, _password) = decrypt_wallet_with_rate_limiting(wallet_path)?;
    let account = Wallet::restore(&secrets.spend_hex(), &secrets.scan_hex())?;
    let rpc = RpcClient::new(rpc_config.clone())?;

    let ringct_report = get_balance(&account, &rpc, BalanceOptions::default()).await?;
    let ct_report = get_balance_ct(&account, &rpc, 0, HashSet::new()).await?;

    println!("RingCT UTXOs ({}):", ringct_report.utxos.len());
    for utxo in &ringct_report.utxos {
        println!(
            "  {} (ringct_index {}, vout {}): {}",
            hex::encode(utxo.txid),
            utxo.ringct_index,
            utxo.vout,
            format_amount(utxo.amount)
        );
    }

    println!();
    println!("CT UTXOs ({}):", ct_report.utxos.len());
    for utxo in &ct_report.utxos {
        println!("  {} (vout {}): {}", hex::encode(utxo.txid), utxo.vout, format_amount(utxo.amount));
    }

    let health = wallet_health(ringct_report.utxos.len());
    println!();
    println!("Wallet health: {:?}", health);
    match health {
        sv_transaction_builder::WalletHealth::Fragmented => {
            println!("Consider consolidating: the next send may need to split into multiple transactions.");
        }
        sv_transaction_builder::WalletHealth::Critical => {
            println!("Wallet is critically fragmented: sends will require consolidation batches.");
        }
        sv_transaction_builder::WalletHealth::Healthy => {}
    }

    Ok(())
}
