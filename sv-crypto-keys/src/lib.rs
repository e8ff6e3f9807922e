//! Typed secp256k1 operations: the "crypto facade" of the confidential
//! transaction engine (§4.1).
//!
//! This crate deliberately exposes narrow, typed operations instead of
//! raw curve arithmetic, so every caller above it works with `Scalar` and
//! `Point` rather than byte slices. `sv-crypto-ring-signature` builds
//! Pedersen commitments, range proofs and MLSAG on top of the point
//! arithmetic re-exported here.

mod ecdh;
mod ecdsa;
mod error;
mod hash;
mod point;
mod scalar;

pub use ecdh::{rangeproof_nonce, shared_secret};
pub use ecdsa::{ecdsa_sign, ecdsa_sign_compact};
pub use error::{Error, Result};
pub use hash::{double_sha256, hash160, keccak256, sha256, Hash};
pub use point::{derive_pub, point_add_scalar, point_multiply, CurvePoint, Point};
pub use scalar::{private_add, private_sub, Scalar};
