use crate::error::{Error, Result};
use bech32::{FromBase32, ToBase32, Variant};
use sv_crypto_keys::Point;

/// Bech32 human-readable part for stealth addresses (§4.2, §6).
pub const HRP: &str = "sv";
const MIN_LEN: usize = 60;
const MAX_LEN: usize = 122;

/// A receiver's stealth address: the scan/spend public key pair plus the
/// small option fields the wire payload carries alongside them (§3, §4.2).
///
/// `prefix_bits`/`prefix_bitfield` let a receiver advertise a subnet of
/// one-time addresses it is willing to scan (an optional narrowing used by
/// services that shard scanning); most wallets leave `prefix_bits` at 0.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StealthAddress {
    pub options: u8,
    pub scan_pub: Point,
    pub spend_pub: Point,
    pub num_sigs: u8,
    pub prefix_bits: u8,
    pub prefix_bitfield: u32,
}

impl StealthAddress {
    pub fn new(scan_pub: Point, spend_pub: Point) -> Self {
        Self {
            options: 0,
            scan_pub,
            spend_pub,
            num_sigs: 1,
            prefix_bits: 0,
            prefix_bitfield: 0,
        }
    }

    /// `[options:1][scanPub:33][nSpendKeys:1=1][spendPub:33][nSigs:1][prefixBits:1][prefixBitfield?]` (§4.2).
    fn to_payload(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(70);
        out.push(self.options);
        out.extend_from_slice(&self.scan_pub.to_bytes());
        out.push(1u8); // nSpendKeys
        out.extend_from_slice(&self.spend_pub.to_bytes());
        out.push(self.num_sigs);
        out.push(self.prefix_bits);
        if self.prefix_bits >= 1 {
            let nbytes = (self.prefix_bits as usize).div_ceil(8);
            let be = self.prefix_bitfield.to_be_bytes();
            out.extend_from_slice(&be[4 - nbytes..]);
        }
        out
    }

    fn from_payload(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 1 + 33 + 1 + 33 + 1 + 1 {
            return Err(Error::Truncated);
        }
        let mut offset = 0;
        let options = bytes[offset];
        offset += 1;

        let scan_pub = parse_pubkey(bytes, offset)?;
        offset += 33;

        let n_spend_keys = bytes[offset];
        offset += 1;
        if n_spend_keys != 1 {
            return Err(Error::UnsupportedSpendKeyCount(n_spend_keys));
        }

        let spend_pub = parse_pubkey(bytes, offset)?;
        offset += 33;

        let num_sigs = bytes[offset];
        offset += 1;
        let prefix_bits = bytes[offset];
        offset += 1;

        let mut prefix_bitfield = 0u32;
        if prefix_bits >= 1 {
            let nbytes = (prefix_bits as usize).div_ceil(8);
            if bytes.len() < offset + nbytes {
                return Err(Error::Truncated);
            }
            let mut be = [0u8; 4];
            be[4 - nbytes..].copy_from_slice(&bytes[offset..offset + nbytes]);
            prefix_bitfield = u32::from_be_bytes(be);
        }

        Ok(Self {
            options,
            scan_pub,
            spend_pub,
            num_sigs,
            prefix_bits,
            prefix_bitfield,
        })
    }

    /// Encodes to the `sv1...` bech32 address string (§4.2, §6).
    pub fn encode(&self) -> Result<String> {
        let payload = self.to_payload();
        bech32::encode(HRP, payload.to_base32(), Variant::Bech32)
            .map_err(|e| Error::Bech32(e.to_string()))
    }

    /// Decodes and validates a bech32 stealth address string (§4.2, §8.2).
    pub fn decode(address: &str) -> Result<Self> {
        if address.len() < MIN_LEN {
            return Err(Error::TooShort(address.len()));
        }
        if address.len() > MAX_LEN {
            return Err(Error::TooLong(address.len()));
        }
        let (hrp, data, _variant) = bech32::decode(address).map_err(|e| Error::Bech32(e.to_string()))?;
        if hrp != HRP {
            return Err(Error::WrongHrp(hrp));
        }
        let payload = Vec::<u8>::from_base32(&data).map_err(|e| Error::Bech32(e.to_string()))?;
        Self::from_payload(&payload)
    }
}

fn parse_pubkey(bytes: &[u8], offset: usize) -> Result<Point> {
    if bytes.len() < offset + 33 {
        return Err(Error::Truncated);
    }
    let mut raw = [0u8; 33];
    raw.copy_from_slice(&bytes[offset..offset + 33]);
    Point::from_bytes(&raw).map_err(|_| Error::InvalidPubkey(offset))
}

/// `isValidAddress(address) -> bool` (§8 S1/S2): true iff `decode` succeeds.
pub fn is_valid_address(address: &str) -> bool {
    StealthAddress::decode(address).is_ok()
}
