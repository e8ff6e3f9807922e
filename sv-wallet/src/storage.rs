//! Encrypted wallet file: Argon2id key derivation + ChaCha20-Poly1305
//! authenticated encryption, adapted from the teacher's mnemonic-at-rest
//! scheme to store the two raw 32-byte account secrets instead (HD/mnemonic
//! encoding is a spec Non-goal; the encryption mechanism is not).
//!
//! Also carries a [`DecryptionRateLimiter`], a sidecar file tracking failed
//! password attempts, since nothing in the spec's own layers guards against
//! repeated offline guesses against the wallet file.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::{Zeroize, ZeroizeOnDrop};

const WALLET_VERSION: u32 = 1;

const ARGON2_MEMORY_KB: u32 = 65536;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 4;

/// The two account secrets, decrypted. Zeroizes on drop; never printed or
/// logged in full anywhere in this crate.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DecryptedSecrets {
    bytes: [u8; 64],
}

impl DecryptedSecrets {
    pub fn spend_hex(&self) -> String {
        hex::encode(&self.bytes[..32])
    }

    pub fn scan_hex(&self) -> String {
        hex::encode(&self.bytes[32..])
    }
}

/// On-disk wallet file: salted/nonced ciphertext plus the scan-resume
/// bookkeeping the balance aggregator needs across runs.
#[derive(Serialize, Deserialize)]
pub struct EncryptedWallet {
    version: u32,
    salt: String,
    nonce: String,
    ciphertext: String,

    /// Last RingCT (`anon`) watch-only dbindex processed, resumed by `sync`.
    pub last_anon_index: u64,
    /// Last CT (`stealth`) watch-only dbindex processed.
    pub last_ct_index: u64,
    /// Key images already confirmed spent, so repeat scans skip re-checking them.
    pub spent_key_images: Vec<String>,
    /// `(txid, vout)` outpoints already accounted for in the CT balance.
    pub known_ct_outpoints: Vec<(String, u32)>,
    pub network: String,
}

impl EncryptedWallet {
    pub fn encrypt(spend_hex: &str, scan_hex: &str, password: &str) -> Result<Self> {
        let spend = hex::decode(spend_hex).map_err(|_| anyhow!("spend secret is not valid hex"))?;
        let scan = hex::decode(scan_hex).map_err(|_| anyhow!("scan secret is not valid hex"))?;
        if spend.len() != 32 || scan.len() != 32 {
            return Err(anyhow!("account secrets must be 32 bytes each"));
        }
        let mut plaintext = [0u8; 64];
        plaintext[..32].copy_from_slice(&spend);
        plaintext[32..].copy_from_slice(&scan);

        let salt = SaltString::generate(&mut OsRng);
        let key = derive_key(password, salt.as_str())?;

        let mut nonce_bytes = [0u8; 12];
        rand::thread_rng().fill(&mut nonce_bytes);

        let cipher = ChaCha20Poly1305::new_from_slice(&key).map_err(|_| anyhow!("failed to construct cipher"))?;
        let nonce = Nonce::from_slice(&nonce_bytes);
        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_slice())
            .map_err(|_| anyhow!("encryption failed"))?;
        plaintext.zeroize();

        Ok(Self {
            version: WALLET_VERSION,
            salt: salt.to_string(),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(ciphertext),
            last_anon_index: 0,
            last_ct_index: 0,
            spent_key_images: Vec::new(),
            known_ct_outpoints: Vec::new(),
            network: "sv-mainnet".to_string(),
        })
    }

    pub fn decrypt(&self, password: &str) -> Result<DecryptedSecrets> {
        if self.version != WALLET_VERSION {
            return Err(anyhow!("unsupported wallet version {} (expected {})", self.version, WALLET_VERSION));
        }

        let key = derive_key(password, &self.salt)?;
        let nonce_bytes = hex::decode(&self.nonce).map_err(|_| anyhow!("invalid nonce encoding"))?;
        let ciphertext = hex::decode(&self.ciphertext).map_err(|_| anyhow!("invalid ciphertext encoding"))?;
        if nonce_bytes.len() != 12 {
            return Err(anyhow!("invalid nonce length"));
        }

        let cipher = ChaCha20Poly1305::new_from_slice(&key).map_err(|_| anyhow!("failed to construct cipher"))?;
        let nonce = Nonce::from_slice(&nonce_bytes);
        let plaintext = cipher
            .decrypt(nonce, ciphertext.as_slice())
            .map_err(|_| anyhow!("decryption failed - wrong password?"))?;

        if plaintext.len() != 64 {
            return Err(anyhow!("unexpected decrypted payload length"));
        }
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&plaintext);
        Ok(DecryptedSecrets { bytes })
    }

    /// Attempts decryption and updates `limiter` with the outcome: success
    /// resets its failure count, failure bumps it (and may start a
    /// lockout). The limiter is not persisted here — the caller saves it
    /// once, after deciding whether to also update other wallet state.
    pub fn decrypt_with_rate_limit(&self, password: &str, limiter: &mut DecryptionRateLimiter) -> Result<DecryptedSecrets> {
        match self.decrypt(password) {
            Ok(secrets) => {
                limiter.record_success();
                Ok(secrets)
            }
            Err(e) => {
                limiter.record_failure();
                Err(e)
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)?;
            file.write_all(json.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, json)?;
        }

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| anyhow!("failed to read wallet file: {}", e))?;
        serde_json::from_str(&json).map_err(|e| anyhow!("failed to parse wallet file: {}", e))
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn change_password(&mut self, old_password: &str, new_password: &str) -> Result<()> {
        let secrets = self.decrypt(old_password)?;
        let reencrypted = Self::encrypt(&secrets.spend_hex(), &secrets.scan_hex(), new_password)?;
        self.salt = reencrypted.salt;
        self.nonce = reencrypted.nonce;
        self.ciphertext = reencrypted.ciphertext;
        Ok(())
    }
}

fn derive_key(password: &str, salt: &str) -> Result<[u8; 32]> {
    let salt = SaltString::from_b64(salt).map_err(|_| anyhow!("invalid salt format"))?;
    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2::Params::new(ARGON2_MEMORY_KB, ARGON2_ITERATIONS, ARGON2_PARALLELISM, Some(32))
            .map_err(|_| anyhow!("invalid Argon2 parameters"))?,
    );
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| anyhow!("key derivation failed"))?;
    let hash_output = hash.hash.ok_or_else(|| anyhow!("no hash output"))?;
    let mut key = [0u8; 32];
    key.copy_from_slice(&hash_output.as_bytes()[..32]);
    Ok(key)
}

/// Failures before a lockout kicks in.
const MAX_FAILURES: u32 = 5;
/// Base lockout window; doubles (capped) with each additional failure past
/// the threshold, so a sustained guessing script faces geometrically
/// longer waits rather than a single fixed penalty.
const BASE_LOCKOUT_SECONDS: i64 = 60;
const MAX_LOCKOUT_DOUBLINGS: u32 = 6; // caps the lockout at 64x the base (~1h)

/// Tracks failed decryption attempts against one wallet file, persisted as
/// a sidecar JSON file next to it (`<wallet>.ratelimit`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DecryptionRateLimiter {
    failures: u32,
    locked_until_unix: Option<i64>,
}

impl DecryptionRateLimiter {
    pub fn load_for_wallet(wallet_path: &Path) -> Self {
        let path = Self::state_path(wallet_path);
        fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save_for_wallet(&self, wallet_path: &Path) -> Result<()> {
        let path = Self::state_path(wallet_path);
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn state_path(wallet_path: &Path) -> PathBuf {
        let mut name = wallet_path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".ratelimit");
        wallet_path.with_file_name(name)
    }

    /// Returns an error describing the remaining lockout if currently
    /// locked out, otherwise `Ok(())`.
    pub fn check_rate_limit(&self) -> Result<()> {
        if self.is_locked_out() {
            let remaining = self.remaining_lockout_time().unwrap_or_default();
            return Err(anyhow!("too many failed attempts; try again in {}", remaining));
        }
        Ok(())
    }

    pub fn is_locked_out(&self) -> bool {
        match self.locked_until_unix {
            Some(until) => now_unix() < until,
            None => false,
        }
    }

    pub fn remaining_lockout_time(&self) -> Option<String> {
        let until = self.locked_until_unix?;
        let remaining = until - now_unix();
        if remaining <= 0 {
            return None;
        }
        Some(format_duration(remaining))
    }

    fn record_success(&mut self) {
        self.failures = 0;
        self.locked_until_unix = None;
    }

    fn record_failure(&mut self) {
        self.failures = self.failures.saturating_add(1);
        if self.failures >= MAX_FAILURES {
            let doublings = (self.failures - MAX_FAILURES).min(MAX_LOCKOUT_DOUBLINGS);
            let lockout = BASE_LOCKOUT_SECONDS * (1i64 << doublings);
            self.locked_until_unix = Some(now_unix() + lockout);
        }
    }
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

fn format_duration(seconds: i64) -> String {
    if seconds >= 60 {
        format!("{}m{}s", seconds / 60, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SPEND: &str = "1111111111111111111111111111111111111111111111111111111111111111";
    const SCAN: &str = "2222222222222222222222222222222222222222222222222222222222222222";
    const PASSWORD: &str = "correct horse battery staple";

    fn spend_hex() -> String {
        SPEND[..64].to_string()
    }
    fn scan_hex() -> String {
        SCAN[..64].to_string()
    }

    #[test]
    fn encrypt_then_decrypt_recovers_both_secrets() {
        let wallet = EncryptedWallet::encrypt(&spend_hex(), &scan_hex(), PASSWORD).unwrap();
        let secrets = wallet.decrypt(PASSWORD).unwrap();
        assert_eq!(secrets.spend_hex(), spend_hex());
        assert_eq!(secrets.scan_hex(), scan_hex());
    }

    #[test]
    fn wrong_password_fails() {
        let wallet = EncryptedWallet::encrypt(&spend_hex(), &scan_hex(), PASSWORD).unwrap();
        assert!(wallet.decrypt("wrong password").is_err());
    }

    #[test]
    fn save_and_load_roundtrips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wallet.dat");
        let wallet = EncryptedWallet::encrypt(&spend_hex(), &scan_hex(), PASSWORD).unwrap();
        wallet.save(&path).unwrap();
        let loaded = EncryptedWallet::load(&path).unwrap();
        assert_eq!(loaded.decrypt(PASSWORD).unwrap().spend_hex(), spend_hex());
    }

    #[test]
    fn change_password_invalidates_the_old_one() {
        let mut wallet = EncryptedWallet::encrypt(&spend_hex(), &scan_hex(), PASSWORD).unwrap();
        wallet.change_password(PASSWORD, "new password").unwrap();
        assert!(wallet.decrypt(PASSWORD).is_err());
        assert_eq!(wallet.decrypt("new password").unwrap().scan_hex(), scan_hex());
    }

    #[test]
    fn rate_limiter_locks_out_after_enough_failures() {
        let mut limiter = DecryptionRateLimiter::default();
        for _ in 0..MAX_FAILURES {
            limiter.record_failure();
        }
        assert!(limiter.is_locked_out());
        assert!(limiter.check_rate_limit().is_err());
        assert!(limiter.remaining_lockout_time().is_some());
    }

    #[test]
    fn rate_limiter_resets_on_success() {
        let mut limiter = DecryptionRateLimiter::default();
        for _ in 0..MAX_FAILURES {
            limiter.record_failure();
        }
        limiter.record_success();
        assert!(!limiter.is_locked_out());
        assert!(limiter.check_rate_limit().is_ok());
    }

    #[test]
    fn rate_limiter_persists_across_load_for_wallet() {
        let dir = TempDir::new().unwrap();
        let wallet_path = dir.path().join("wallet.dat");

        let mut limiter = DecryptionRateLimiter::load_for_wallet(&wallet_path);
        for _ in 0..MAX_FAILURES {
            limiter.record_failure();
        }
        limiter.save_for_wallet(&wallet_path).unwrap();

        let reloaded = DecryptionRateLimiter::load_for_wallet(&wallet_path);
        assert!(reloaded.is_locked_out());
    }
}
