/// Failure kinds for the crypto facade (§4.1 of the engine's component design).
///
/// No operation in this crate panics; invalid input always surfaces as one
/// of these variants instead.
#[derive(Debug, displaydoc::Display, Clone, Eq, PartialEq)]
pub enum Error {
    /// point is not a valid compressed secp256k1 curve point
    InvalidPoint,
    /// scalar is zero, or not reduced mod the curve order
    InvalidScalar,
    /// ECDSA signing failed
    SigningFailed,
    /// slice has the wrong length: expected {0}, got {1}
    LengthMismatch(usize, usize),
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
