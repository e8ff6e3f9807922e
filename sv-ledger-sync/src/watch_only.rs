//! Raw watch-only record decode (`WatchOnlyTxWithIndex`).
//!
//! The node streams one flat binary record per candidate output; this
//! module only unpacks the header and, for records that carry one, the
//! embedded output payload — it never decides ownership (that is
//! `detect`'s job).

use crate::error::{Error, Result};
use sv_crypto_keys::Point;
use sv_crypto_ring_signature::Commitment;
use sv_transaction_types::varint;

const TYPE_STEALTH: i32 = 0;
const TYPE_ANON: i32 = 1;

/// The RingCT output payload embedded in an ANON-type record:
/// `pubKey(33) || commitment(33) || varint+vData || varint+rangeproof`.
#[derive(Debug, Clone)]
pub struct RingctPayload {
    pub pubkey: Point,
    pub commitment: Commitment,
    pub v_data: Vec<u8>,
    pub range_proof: Vec<u8>,
}

/// The CT output payload embedded in a STEALTH-type record, following the
/// same field order as a wire `Output::Ct`:
/// `commitment(33) || varint+vData || varint+scriptPubkey || varint+rangeproof`.
#[derive(Debug, Clone)]
pub struct CtPayload {
    pub commitment: Commitment,
    pub v_data: Vec<u8>,
    pub script_pubkey: Vec<u8>,
    pub range_proof: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum RecordPayload {
    Stealth(CtPayload),
    Anon(RingctPayload),
}

/// One decoded watch-only record: its header fields plus the type-tagged
/// output payload.
#[derive(Debug, Clone)]
pub struct WatchOnlyRecord {
    pub ringct_index: u64,
    pub scan_secret: [u8; 32],
    pub tx_hash: [u8; 32],
    pub tx_index: u32,
    pub payload: RecordPayload,
}

impl WatchOnlyRecord {
    /// `getId()`: `reverse(txHash)` as hex — Bitcoin display byte order.
    pub fn get_id(&self) -> String {
        let mut reversed = self.tx_hash;
        reversed.reverse();
        hex::encode(reversed)
    }

    /// Decodes one record from its raw bytes.
    ///
    /// Header: `ringctIndex:u64LE || type:i32LE || scanSecret:32B || 2
    /// unused flag bytes || txHash:32B || txIndex:u32LE`, 82 bytes total,
    /// followed by the type-tagged payload.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        const HEADER_LEN: usize = 8 + 4 + 32 + 2 + 32 + 4;
        if bytes.len() < HEADER_LEN {
            return Err(Error::TruncatedRecord {
                needed: HEADER_LEN,
                got: bytes.len(),
            });
        }
        let mut offset = 0usize;
        let ringct_index = read_u64(bytes, &mut offset);
        let record_type = read_i32(bytes, &mut offset);
        let scan_secret = read_32(bytes, &mut offset);
        offset += 2; // unused flag bytes
        let tx_hash = read_32(bytes, &mut offset);
        let tx_index = read_u32(bytes, &mut offset);

        let payload = match record_type {
            TYPE_ANON => RecordPayload::Anon(parse_ringct_payload(bytes, &mut offset)?),
            TYPE_STEALTH => RecordPayload::Stealth(parse_ct_payload(bytes, &mut offset)?),
            other => return Err(Error::UnknownRecordType(other)),
        };

        Ok(Self {
            ringct_index,
            scan_secret,
            tx_hash,
            tx_index,
            payload,
        })
    }
}

fn parse_ringct_payload(bytes: &[u8], offset: &mut usize) -> Result<RingctPayload> {
    let pubkey = read_point(bytes, offset)?;
    let commitment = read_commitment(bytes, offset)?;
    let v_data = read_bytes(bytes, offset)?;
    let range_proof = read_bytes(bytes, offset)?;
    Ok(RingctPayload {
        pubkey,
        commitment,
        v_data,
        range_proof,
    })
}

fn parse_ct_payload(bytes: &[u8], offset: &mut usize) -> Result<CtPayload> {
    let commitment = read_commitment(bytes, offset)?;
    let v_data = read_bytes(bytes, offset)?;
    let script_pubkey = read_bytes(bytes, offset)?;
    let range_proof = read_bytes(bytes, offset)?;
    Ok(CtPayload {
        commitment,
        v_data,
        script_pubkey,
        range_proof,
    })
}

fn read_u64(bytes: &[u8], offset: &mut usize) -> u64 {
    let v = u64::from_le_bytes(bytes[*offset..*offset + 8].try_into().unwrap());
    *offset += 8;
    v
}

fn read_i32(bytes: &[u8], offset: &mut usize) -> i32 {
    let v = i32::from_le_bytes(bytes[*offset..*offset + 4].try_into().unwrap());
    *offset += 4;
    v
}

fn read_u32(bytes: &[u8], offset: &mut usize) -> u32 {
    let v = u32::from_le_bytes(bytes[*offset..*offset + 4].try_into().unwrap());
    *offset += 4;
    v
}

fn read_32(bytes: &[u8], offset: &mut usize) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes[*offset..*offset + 32]);
    *offset += 32;
    out
}

fn read_33<'a>(bytes: &'a [u8], offset: &mut usize) -> Result<&'a [u8; 33]> {
    let end = *offset + 33;
    let slice = bytes
        .get(*offset..end)
        .ok_or(Error::TruncatedRecord { needed: end, got: bytes.len() })?;
    *offset = end;
    Ok(slice.try_into().unwrap())
}

fn read_point(bytes: &[u8], offset: &mut usize) -> Result<Point> {
    Ok(Point::from_bytes(read_33(bytes, offset)?)?)
}

fn read_commitment(bytes: &[u8], offset: &mut usize) -> Result<Commitment> {
    Ok(Commitment::from_bytes(read_33(bytes, offset)?)?)
}

fn read_bytes(bytes: &[u8], offset: &mut usize) -> Result<Vec<u8>> {
    Ok(varint::decode_bytes(bytes, offset)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use sv_crypto_keys::{derive_pub, Scalar};
    use sv_crypto_ring_signature::pedersen_commit;

    fn sample_anon_record() -> (Vec<u8>, [u8; 32]) {
        let pubkey = derive_pub(&Scalar::random(&mut OsRng)).unwrap();
        let commitment = pedersen_commit(500, &Scalar::random(&mut OsRng)).unwrap();
        let tx_hash = [0x11u8; 32];

        let mut buf = Vec::new();
        buf.extend_from_slice(&42u64.to_le_bytes());
        buf.extend_from_slice(&TYPE_ANON.to_le_bytes());
        buf.extend_from_slice(&[0u8; 32]);
        buf.extend_from_slice(&[0u8; 2]);
        buf.extend_from_slice(&tx_hash);
        buf.extend_from_slice(&3u32.to_le_bytes());
        buf.extend_from_slice(&pubkey.to_bytes());
        buf.extend_from_slice(&commitment.to_bytes());
        varint::encode_bytes(&[0xEE; 33], &mut buf);
        varint::encode_bytes(&[0xAA; 16], &mut buf);
        (buf, tx_hash)
    }

    #[test]
    fn parses_anon_record_header_and_payload() {
        let (bytes, tx_hash) = sample_anon_record();
        let record = WatchOnlyRecord::parse(&bytes).unwrap();
        assert_eq!(record.ringct_index, 42);
        assert_eq!(record.tx_hash, tx_hash);
        assert_eq!(record.tx_index, 3);
        assert!(matches!(record.payload, RecordPayload::Anon(_)));
    }

    #[test]
    fn get_id_reverses_tx_hash() {
        let (bytes, tx_hash) = sample_anon_record();
        let record = WatchOnlyRecord::parse(&bytes).unwrap();
        let mut expected = tx_hash;
        expected.reverse();
        assert_eq!(record.get_id(), hex::encode(expected));
    }

    #[test]
    fn rejects_truncated_header() {
        let bytes = vec![0u8; 10];
        assert!(WatchOnlyRecord::parse(&bytes).is_err());
    }

    #[test]
    fn rejects_unknown_type_tag() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&1u64.to_le_bytes());
        buf.extend_from_slice(&7i32.to_le_bytes());
        buf.extend_from_slice(&[0u8; 32]);
        buf.extend_from_slice(&[0u8; 2]);
        buf.extend_from_slice(&[0u8; 32]);
        buf.extend_from_slice(&0u32.to_le_bytes());
        assert!(matches!(WatchOnlyRecord::parse(&buf), Err(Error::UnknownRecordType(7))));
    }
}
