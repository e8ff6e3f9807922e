/// Failure kinds for the wire data model (§3, §4.5, §7 Parse).
#[derive(Debug, displaydoc::Display, Clone, Eq, PartialEq)]
pub enum Error {
    /// unexpected end of buffer while reading {0}
    UnexpectedEof(&'static str),
    /// unknown output type byte {0:#x}
    UnknownOutputType(u8),
    /// varint is not minimally encoded
    NonMinimalVarint,
    /// LEB128 value overflowed 64 bits
    Leb128Overflow,
    /// amount {0} exceeds the maximum supply
    AmountOutOfRange(u64),
    /// wrapped crypto-facade failure: {0}
    Keys(sv_crypto_keys::Error),
    /// wrapped ring-signature failure: {0}
    RingSignature(sv_crypto_ring_signature::Error),
    /// trailing bytes after parsing a complete transaction
    TrailingBytes,
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

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
