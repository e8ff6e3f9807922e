//! Print the wallet's receiving address.

use anyhow::Result;
use std::path::Path;
use sv_account_keys::Wallet;

use crate::storage::EncryptedWallet;

use super::{decrypt_wallet_with_rate_limiting, print_error};

pub fn run(wallet_path: &Path) -> Result<()> {
    if !EncryptedWallet::exists(wallet_path) {
        print_error("No wallet found. Run 'sv-wallet init' first.");
        return Ok(());
    }

    let (_wallet, secrets, _password) = decrypt_wallet_with_rate_limiting(wallet_path)?;
    let account = Wallet::restore(&secrets.spend_hex(), &secrets.scan_hex())?;

    println!("{}", account.address()?);
    Ok(())
}
