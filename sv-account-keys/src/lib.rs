//! Stealth addresses, ephemeral key exchange and wallet construction
//! (§4.2 — "the stealth layer").
//!
//! Built on `sv-crypto-keys`; has no notion of transactions, outputs or
//! the wire format, which live in `sv-transaction-types`/`sv-transaction-core`.

mod address;
mod ephemeral;
mod error;
mod wallet;

pub use address::{is_valid_address, StealthAddress, HRP};
pub use ephemeral::{derive_ct_spend_key, derive_destination, recover_destination_secret, EphemeralOutput};
pub use error::{Error, Result};
pub use wallet::Wallet;
