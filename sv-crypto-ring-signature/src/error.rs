/// Failure kinds for ring-signature and range-proof operations (§4.1, §7).
#[derive(Debug, displaydoc::Display, Clone, Eq, PartialEq)]
pub enum Error {
    /// wrapped crypto-facade failure: {0}
    Keys(sv_crypto_keys::Error),
    /// slice has the wrong length: expected {0}, got {1}
    LengthMismatch(usize, usize),
    /// ring index out of bounds: {0}
    IndexOutOfBounds(usize),
    /// range proof rejected verification
    ProofRejected,
    /// MLSAG signature failed to verify
    MlsagInvalid,
    /// key image is invalid or duplicated within a ring
    InvalidKeyImage,
    /// sum of input and output commitments does not balance
    ValueNotConserved,
}

impl From<sv_crypto_keys::Error> for Error {
    fn from(e: sv_crypto_keys::Error) -> Self {
        Error::Keys(e)
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
