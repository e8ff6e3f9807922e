//! CLI command implementations.

pub mod address;
pub mod balance;
pub mod export;
pub mod history;
pub mod init;
pub mod send;
pub mod sync;

use anyhow::Result;
use std::io::{self, Write};
use std::path::Path;

use crate::storage::{DecryptedSecrets, DecryptionRateLimiter, EncryptedWallet};

pub fn prompt_password(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    Ok(rpassword::read_password()?)
}

pub fn prompt_confirm(message: &str) -> Result<bool> {
    print!("{} [y/N]: ", message);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y") || input.trim().eq_ignore_ascii_case("yes"))
}

pub fn print_error(message: &str) {
    eprintln!("\x1b[31mError:\x1b[0m {}", message);
}

pub fn print_success(message: &str) {
    println!("\x1b[32m{}\x1b[0m", message);
}

pub fn print_warning(message: &str) {
    println!("\x1b[33mWarning:\x1b[0m {}", message);
}

/// Loads the wallet file and decrypts it under rate-limiting protection:
/// checks for an active lockout, prompts for the password, attempts
/// decryption, then persists the rate limiter's updated state regardless
/// of outcome (a crash between attempt and save should not give an
/// attacker a free retry).
pub fn decrypt_wallet_with_rate_limiting(wallet_path: &Path) -> Result<(EncryptedWallet, DecryptedSecrets, String)> {
    let mut limiter = DecryptionRateLimiter::load_for_wallet(wallet_path);

    if let Err(e) = limiter.check_rate_limit() {
        print_error(&e.to_string());
        return Err(e);
    }

    let wallet = EncryptedWallet::load(wallet_path)?;
    let password = prompt_password("Enter wallet password: ")?;

    match wallet.decrypt_with_rate_limit(&password, &mut limiter) {
        Ok(secrets) => {
            if let Err(e) = limiter.save_for_wallet(wallet_path) {
                eprintln!("Warning: failed to save rate limiter state: {}", e);
            }
            Ok((wallet, secrets, password))
        }
        Err(e) => {
            if let Err(save_err) = limiter.save_for_wallet(wallet_path) {
                eprintln!("Warning: failed to save rate limiter state: {}", save_err);
            }
            print_error(&e.to_string());
            Err(e)
        }
    }
}
