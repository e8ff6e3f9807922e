//! Pedersen commitments, range proofs, key images and MLSAG ring
//! signatures built on top of `sv-crypto-keys`' curve arithmetic (§4.1).
//!
//! This crate is the "ring signature" half of the crypto facade: every
//! operation here takes and returns the typed `Commitment`/`KeyImage`/
//! `RangeProof` newtypes rather than raw points, so callers in
//! `sv-transaction-core` and `sv-transaction-builder` never touch curve
//! arithmetic directly.

mod commitment;
mod error;
mod generators;
mod key_image;
mod mlsag;
mod rangeproof;
mod scalar_ext;

pub use commitment::{pedersen_blind_sum, pedersen_commit, pedersen_commit_zero_blind, Commitment};
pub use error::{Error, Result};
pub use generators::{hash_to_point, hash_to_point_for_key_image, pedersen_h};
pub use key_image::KeyImage;
pub use mlsag::{generate_mlsag, prepare_mlsag, verify_mlsag, MlsagSignature, RingMember};
pub use rangeproof::{select_params, RangeProof, RangeProofParams};
