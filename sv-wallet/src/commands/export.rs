//! Export the wallet's account secrets for backup.

use anyhow::Result;
use std::fs;
use std::path::Path;
use sv_account_keys::Wallet;

use crate::storage::EncryptedWallet;

use super::{decrypt_wallet_with_rate_limiting, print_error, print_success, print_warning, prompt_confirm};

pub fn run(wallet_path: &Path, output: Option<String>) -> Result<()> {
    if !EncryptedWallet::exists(wallet_path) {
        print_error("No wallet found. Run 'sv-wallet init' first.");
        return Ok(());
    }

    let (_wallet, secrets, _password) = decrypt_wallet_with_rate_limiting(wallet_path)?;
    let account = Wallet::restore(&secrets.spend_hex(), &secrets.scan_hex())?;

    if let Some(output_path) = output {
        let output_path = Path::new(&output_path);
        if output_path.exists() && !prompt_confirm("Output file exists. Overwrite?")? {
            println!("Aborted.");
            return Ok(());
        }

        let backup = format!(
            "# sv-wallet backup\n\
             # Created: {}\n\
             # Address: {}\n\
             #\n\
             # KEEP THIS FILE SAFE AND SECRET!\n\
             # Anyone with both secrets below can spend your funds.\n\
             \n\
             spend: {}\n\
             scan:  {}\n",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            account.address()?,
            secrets.spend_hex(),
            secrets.scan_hex(),
        );

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(output_path)?;
            file.write_all(backup.as_bytes())?;
        }
        #[cfg(not(unix))]
        {
            fs::write(output_path, backup)?;
        }

        println!();
        print_success(&format!("Backup saved to: {}", output_path.display()));
        print_warning("Keep this file safe and secret!");
    } else {
        println!();
        print_warning("Anyone with these secrets can spend your funds.");
        if !prompt_confirm("Show account secrets on screen?")? {
            println!("Aborted.");
            return Ok(());
        }
        println!();
        println!("spend secret: {}", secrets.spend_hex());
        println!("scan secret:  {}", secrets.scan_hex());
        println!();
        println!("Address: {}", account.address()?);
    }

    Ok(())
}
