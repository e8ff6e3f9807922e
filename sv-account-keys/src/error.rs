/// Failure kinds for stealth address codec and wallet construction (§4.2, §7).
#[derive(Debug, displaydoc::Display, Clone, Eq, PartialEq)]
pub enum Error {
    /// wrapped crypto-facade failure: {0}
    Keys(sv_crypto_keys::Error),
    /// bech32 decode failed: {0}
    Bech32(String),
    /// address prefix must be "sv1", found {0:?}
    WrongHrp(String),
    /// address is too short: {0} chars, minimum 60
    TooShort(usize),
    /// address is too long: {0} chars, maximum 122
    TooLong(usize),
    /// address payload is truncated
    Truncated,
    /// public key at offset {0} has an invalid length or prefix
    InvalidPubkey(usize),
    /// declared spend key count must be 1, found {0}
    UnsupportedSpendKeyCount(u8),
}

impl From<sv_crypto_keys::Error> for Error {
    fn from(e: sv_crypto_keys::Error) -> Self {
        Error::Keys(e)
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
