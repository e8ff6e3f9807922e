//! Output construction and the derived transaction operations that sit on
//! top of the wire data model: range-proof parameter selection, the
//! outputs-hash MLSAG preimage, the legacy CT sighash, and txid (§4.3,
//! §4.5).

mod error;
mod output_builder;
mod preimage;
mod rangeproof_params;
mod sighash;
mod txid;

pub use error::{Error, Result};
pub use output_builder::{build_fee_output, build_ringct_output, OutputDraft};
pub use preimage::outputs_hash;
pub use rangeproof_params::{select_params, RangeProofParams};
pub use sighash::{legacy_sighash, SIGHASH_ALL};
pub use txid::{txid, txid_hex};
