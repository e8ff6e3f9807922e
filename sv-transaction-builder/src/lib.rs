//! The transaction assembler (§4.4): coin selection, ring assembly,
//! blind-sum balancing, the single- and multi-input MLSAG drivers,
//! witness encoding, CT-input ECDSA signing, and multi-transaction send
//! planning for wallets too fragmented to fit one build.

mod assembler;
mod coin_selection;
mod ct_signing;
mod error;
mod mlsag_driver;
mod ring_assembly;
mod send_plan;
mod witness;

pub use assembler::{build_send, BuiltTransaction, SendRequest};
pub use coin_selection::{select_coins, wallet_health, CoinSelection, WalletHealth, CONSOLIDATION_THRESHOLD, MAX_INPUTS};
pub use ct_signing::sign_ct_input;
pub use error::{Error, Result};
pub use mlsag_driver::{sign_multi_input, sign_single_input, SignedInput};
pub use ring_assembly::{assemble_ring, AssembledRing, DecoyCandidate, DEFAULT_RING_SIZE};
pub use send_plan::{plan_send, SendBatch, SendPlan};
pub use witness::encode_mlsag_witness;
