//! Wallet initialization command.

use anyhow::{anyhow, Result};
use rand::rngs::OsRng;
use std::io::{self, Write};
use std::path::Path;
use sv_account_keys::Wallet;

use crate::storage::EncryptedWallet;

use super::{print_error, print_success, print_warning, prompt_confirm, prompt_password};

pub fn run(wallet_path: &Path, recover: bool) -> Result<()> {
    if EncryptedWallet::exists(wallet_path) {
        print_error("Wallet already exists at this location");
        println!("Path: {}", wallet_path.display());
        if !prompt_confirm("Overwrite existing wallet?")? {
            println!("Aborted.");
            return Ok(());
        }
        print_warning("Existing wallet will be overwritten!");
    }

    let (wallet, spend_hex, scan_hex) = if recover {
        prompt_secrets()?
    } else {
        let wallet = Wallet::create(&mut OsRng)?;
        let spend_hex = wallet.spend_hex();
        let scan_hex = wallet.scan_hex();
        display_new_secrets(&spend_hex, &scan_hex)?;
        (wallet, spend_hex, scan_hex)
    };

    println!();
    let password = prompt_new_password()?;

    let encrypted = EncryptedWallet::encrypt(&spend_hex, &scan_hex, &password)?;
    encrypted.save(wallet_path)?;

    println!();
    print_success("Wallet created successfully!");
    println!();
    println!("Receiving address:");
    println!("  {}", wallet.address()?);
    println!();
    println!("Wallet saved to: {}", wallet_path.display());

    if !recover {
        println!();
        print_warning("IMPORTANT: back up your spend and scan secrets (see above) now!");
        print_warning("Anyone with both secrets can spend your funds; losing them loses the wallet.");
    }

    Ok(())
}

fn display_new_secrets(spend_hex: &str, scan_hex: &str) -> Result<()> {
    println!();
    println!("Your account secrets (write these down and store them safely):");
    println!();
    println!("  spend secret: {}", spend_hex);
    println!("  scan secret:  {}", scan_hex);
    println!();
    if !prompt_confirm("Have you written down both secrets?")? {
        return Err(anyhow!("please back up your account secrets before continuing"));
    }
    Ok(())
}

fn prompt_secrets() -> Result<(Wallet, String, String)> {
    println!();
    println!("Enter your spend secret (64 hex characters):");
    let spend_hex = read_line()?;
    println!("Enter your scan secret (64 hex characters):");
    let scan_hex = read_line()?;

    let wallet = Wallet::restore(&spend_hex, &scan_hex).map_err(|e| anyhow!("invalid account secrets: {}", e))?;
    Ok((wallet, spend_hex, scan_hex))
}

fn read_line() -> Result<String> {
    print!("> ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_lowercase())
}

fn prompt_new_password() -> Result<String> {
    loop {
        let password = prompt_password("Enter wallet password: ")?;
        if password.len() < 8 {
            print_error("Password must be at least 8 characters");
            continue;
        }
        let confirm = prompt_password("Confirm password: ")?;
        if password != confirm {
            print_error("Passwords do not match");
            continue;
        }
        return Ok(password);
    }
}
