/// Failure kinds for transaction assembly (§4.4, §7). Matches the
/// taxonomy's shape: coin selection can locally recover by stepping down
/// to fewer inputs; everything else is fatal for the build.
#[derive(Debug, displaydoc::Display, Clone, Eq, PartialEq)]
pub enum Error {
    /// wrapped crypto-facade failure: {0}
    Keys(sv_crypto_keys::Error),
    /// wrapped ring-signature failure: {0}
    RingSignature(sv_crypto_ring_signature::Error),
    /// wrapped transaction-types failure: {0}
    Types(sv_transaction_types::Error),
    /// wrapped transaction-core failure: {0}
    Core(sv_transaction_core::Error),
    /// wrapped account-keys failure: {0}
    AccountKeys(sv_account_keys::Error),
    /// ring size {0} is outside the allowed [3, 32] range
    InvalidRingSize(usize),
    /// insufficient funds: need {needed}, have {available}
    InsufficientFunds { needed: u64, available: u64 },
    /// too many inputs required ({0} > 32); consider consolidating first
    TooManyInputs(usize),
    /// decoy pool could not supply {needed} non-conflicting members (have {available})
    DecoyShortage { needed: usize, available: usize },
    /// destination public key did not match the expected one-time address
    DestinationMismatch,
    /// MLSAG signature failed self-verification after generation
    MlsagInvalid,
    /// transaction has no inputs
    NoInputs,
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

impl From<sv_transaction_core::Error> for Error {
    fn from(e: sv_transaction_core::Error) -> Self {
        Error::Core(e)
    }
}

impl From<sv_account_keys::Error> for Error {
    fn from(e: sv_account_keys::Error) -> Self {
        Error::AccountKeys(e)
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
