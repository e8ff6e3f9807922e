/// Failure kinds for watch-only record parsing, receiver detection and
/// balance aggregation.
#[derive(Debug, displaydoc::Display)]
pub enum Error {
    /// watch-only record is truncated: needs at least {needed} bytes, has {got}
    TruncatedRecord { needed: usize, got: usize },
    /// watch-only record carries an unknown type tag {0}
    UnknownRecordType(i32),
    /// wrapped crypto-facade failure: {0}
    Keys(sv_crypto_keys::Error),
    /// wrapped ring-signature failure: {0}
    RingSignature(sv_crypto_ring_signature::Error),
    /// wrapped stealth-layer failure: {0}
    Account(sv_account_keys::Error),
    /// wrapped wire-format failure: {0}
    Wire(sv_transaction_types::Error),
    /// wrapped RPC failure: {0}
    Rpc(sv_rpc::Error),
    /// {field} in a getwatchonlytxes record is not valid hex
    InvalidHex { field: &'static str },
}

impl std::error::Error for Error {}

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

impl From<sv_account_keys::Error> for Error {
    fn from(e: sv_account_keys::Error) -> Self {
        Error::Account(e)
    }
}

impl From<sv_transaction_types::Error> for Error {
    fn from(e: sv_transaction_types::Error) -> Self {
        Error::Wire(e)
    }
}

impl From<sv_rpc::Error> for Error {
    fn from(e: sv_rpc::Error) -> Self {
        Error::Rpc(e)
    }
}

pub type Result<T> = core::result::Result<T, Error>;
