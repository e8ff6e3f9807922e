//! Build, sign and broadcast a RingCT send (§4.4), consolidating first via
//! [`plan_send`] when the wallet is too fragmented to pay in one transaction.

use anyhow::{anyhow, Result};
use rand::rngs::OsRng;
use std::path::Path;
use sv_account_keys::{StealthAddress, Wallet};
use sv_ledger_sync::{get_balance, BalanceOptions};
use sv_rpc::{methods, RpcClient, RpcConfig};
use sv_transaction_builder::{build_send, plan_send, SendRequest, MAX_INPUTS};

use crate::storage::EncryptedWallet;

use super::balance::format_amount;
use super::{decrypt_wallet_with_rate_limiting, print_error, print_success, print_warning};

pub async fn run(
    wallet_path: &Path,
    rpc_config: &RpcConfig,
    recipient: &str,
    amount: u64,
    fee_per_kb: u64,
    ring_size: usize,
) -> Result<()> {
    if !EncryptedWallet::exists(wallet_path) {
        print_error("No wallet found. Run 'sv-wallet init' first.");
        return Ok(());
    }

    let recipient_address = StealthAddress::decode(recipient).map_err(|e| anyhow!("invalid recipient address: {}", e))?;

    let (_stored, secrets, _password) = decrypt_wallet_with_rate_limiting(wallet_path)?;
    let account = Wallet::restore(&secrets.spend_hex(), &secrets.scan_hex())?;
    let rpc = RpcClient::new(rpc_config.clone())?;

    println!();
    println!("Scanning spendable RingCT outputs...");
    let report = get_balance(&account, &rpc, BalanceOptions::default()).await?;
    let utxos = report.utxos;

    if utxos.is_empty() {
        print_error("No spendable RingCT outputs found.");
        return Ok(());
    }

    let n_decoy_inputs = utxos.len().min(MAX_INPUTS) as u32;
    let decoy_pool = methods::get_anon_outputs(&rpc, n_decoy_inputs, ring_size as u32).await?;

    let plan = plan_send(&utxos, amount, fee_per_kb, ring_size, 3, &mut OsRng)?;

    if plan.batches.len() > 1 {
        print_warning(&format!(
            "Wallet is fragmented: this send needs {} consolidation transaction(s) before the payment.",
            plan.batches.len() - 1
        ));
    }

    for batch in &plan.batches {
        if batch.utxos.is_empty() {
            print_warning(
                "Consolidation outputs are not yet spendable UTXOs. Run 'sv-wallet sync' once the \
                 consolidation transactions above confirm, then re-run 'send' to complete the payment.",
            );
            break;
        }

        let (target_address, label) = if batch.is_final {
            (&recipient_address, "payment")
        } else {
            (&account.stealth_address, "consolidation")
        };

        let request = SendRequest {
            utxos: &batch.utxos,
            recipient: target_address,
            amount: batch.amount,
            change_address: &account.stealth_address,
            decoy_pool: &decoy_pool,
            ring_size,
            fee_per_kb,
        };

        let built = build_send(&request, &mut OsRng)?;
        let tx_bytes = built.transaction.serialize()?;
        let tx_hex = hex::encode(tx_bytes);

        println!();
        println!("Broadcasting {} transaction ({} inputs, fee {})...", label, batch.utxos.len(), format_amount(built.fee));
        let txid = methods::send_raw_transaction(&rpc, &tx_hex).await?;
        print_success(&format!("Broadcast: {}", txid));
    }

    println!();
    println!("Total fees: {}", format_amount(plan.total_fee));

    Ok(())
}
