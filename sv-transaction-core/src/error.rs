/// Failure kinds for output construction and serialization-adjacent
/// operations (§4.3, §4.5, §7).
#[derive(Debug, displaydoc::Display, Clone, Eq, PartialEq)]
pub enum Error {
    /// wrapped crypto-facade failure: {0}
    Keys(sv_crypto_keys::Error),
    /// wrapped ring-signature failure: {0}
    RingSignature(sv_crypto_ring_signature::Error),
    /// wrapped transaction-types failure: {0}
    Types(sv_transaction_types::Error),
    /// wrapped account-keys failure: {0}
    AccountKeys(sv_account_keys::Error),
    /// range proof rejected verification
    ProofRejected,
    /// transaction has no inputs to sign
    NoInputs,
    /// output index {0} is out of range for this transaction
    OutputIndexOutOfRange(usize),
}

impl From<sv_crypto_keys::Error> for Error {
    fn from(e: sv_crypto_keys::Error) -> Self {
        Error::Keys(e)
    }
}

impl From<sv_crypto_ring_signature::Error> for Error {
    fn from(e: sv_crypto_ring_signature::Error) -> Self {
        Error::RingSignature(e)
    }
}

impl From<sv_transaction_types::Error> for Error {
    fn from(e: sv_transaction_types::Error) -> Self {
        Error::Types(e)
    }
}

impl From<sv_account_keys::Error> for Error {
    fn from(e: sv_account_keys::Error) -> Self {
        Error::AccountKeys(e)
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
