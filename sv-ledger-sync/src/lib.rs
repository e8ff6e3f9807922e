//! Watch-only record decode, receiver detection and balance aggregation.
//!
//! Built on `sv-account-keys` for the stealth-layer recovery math and
//! `sv-rpc` for the node's watch-only/key-image surface; has no notion of
//! coin selection or transaction assembly, which live in
//! `sv-transaction-builder`.

pub mod balance;
pub mod detect;
mod error;
pub mod watch_only;

pub use balance::{get_balance, get_balance_ct, BalanceCtReport, BalanceOptions, BalanceReport};
pub use detect::{detect_ct_output, detect_ringct_output, RewindOverride};
pub use error::{Error, Result};
pub use watch_only::{CtPayload, RecordPayload, RingctPayload, WatchOnlyRecord};
