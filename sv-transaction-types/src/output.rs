use crate::error::{Error, Result};
use crate::varint;
use sv_crypto_ring_signature::Commitment;

/// `DO_FEE` data-output marker (§4.3, §6).
pub const DO_FEE: u8 = 0x06;

const TYPE_STANDARD: u8 = 0;
const TYPE_CT: u8 = 1;
const TYPE_RINGCT: u8 = 2;
const TYPE_DATA: u8 = 3;

/// A transaction output, tagged by family (§3). `OUTPUT_DATA` carries no
/// value and is used exclusively for non-value records, chiefly the fee.
#[derive(Debug, Clone)]
pub enum Output {
    Standard {
        value: u64,
        script_pubkey: Vec<u8>,
    },
    Ct {
        commitment: Commitment,
        v_data: Vec<u8>,
        script_pubkey: Vec<u8>,
        range_proof: Vec<u8>,
    },
    RingCt {
        dest_pub: [u8; 33],
        commitment: Commitment,
        v_data: Vec<u8>,
        range_proof: Vec<u8>,
    },
    Data {
        v_data: Vec<u8>,
    },
}

impl Output {
    pub fn fee(fee: u64) -> Self {
        let mut v_data = vec![DO_FEE];
        crate::leb128::encode(fee, &mut v_data);
        Output::Data { v_data }
    }

    fn type_byte(&self) -> u8 {
        match self {
            Output::Standard { .. } => TYPE_STANDARD,
            Output::Ct { .. } => TYPE_CT,
            Output::RingCt { .. } => TYPE_RINGCT,
            Output::Data { .. } => TYPE_DATA,
        }
    }

    /// Serializes the output's payload **without** its type byte — the
    /// form used both inside the full transaction encoding and as the
    /// per-output input to the outputs-hash preimage (§4.4, §4.5).
    pub fn serialize_payload(&self, out: &mut Vec<u8>) {
        match self {
            Output::Standard { value, script_pubkey } => {
                out.extend_from_slice(&value.to_le_bytes());
                varint::encode_bytes(script_pubkey, out);
            }
            Output::Ct {
                commitment,
                v_data,
                script_pubkey,
                range_proof,
            } => {
                out.extend_from_slice(&commitment.to_bytes());
                varint::encode_bytes(v_data, out);
                varint::encode_bytes(script_pubkey, out);
                varint::encode_bytes(range_proof, out);
            }
            Output::RingCt {
                dest_pub,
                commitment,
                v_data,
                range_proof,
            } => {
                out.extend_from_slice(dest_pub);
                out.extend_from_slice(&commitment.to_bytes());
                varint::encode_bytes(v_data, out);
                varint::encode_bytes(range_proof, out);
            }
            Output::Data { v_data } => {
                varint::encode_bytes(v_data, out);
            }
        }
    }

    pub fn serialize_full(&self, out: &mut Vec<u8>) {
        out.push(self.type_byte());
        self.serialize_payload(out);
    }

    pub fn parse_full(bytes: &[u8], offset: &mut usize) -> Result<Self> {
        let type_byte = *bytes.get(*offset).ok_or(Error::UnexpectedEof("output type"))?;
        *offset += 1;
        Self::parse_payload(type_byte, bytes, offset)
    }

    fn parse_payload(type_byte: u8, bytes: &[u8], offset: &mut usize) -> Result<Self> {
        match type_byte {
            TYPE_STANDARD => {
                let value = read_u64(bytes, offset)?;
                let script_pubkey = varint::decode_bytes(bytes, offset)?;
                Ok(Output::Standard { value, script_pubkey })
            }
            TYPE_CT => {
                let commitment = read_commitment(bytes, offset)?;
                let v_data = varint::decode_bytes(bytes, offset)?;
                let script_pubkey = varint::decode_bytes(bytes, offset)?;
                let range_proof = varint::decode_bytes(bytes, offset)?;
                Ok(Output::Ct {
                    commitment,
                    v_data,
                    script_pubkey,
                    range_proof,
                })
            }
            TYPE_RINGCT => {
                let dest_pub = read_33(bytes, offset)?;
                let commitment = read_commitment(bytes, offset)?;
                let v_data = varint::decode_bytes(bytes, offset)?;
                let range_proof = varint::decode_bytes(bytes, offset)?;
                Ok(Output::RingCt {
                    dest_pub,
                    commitment,
                    v_data,
                    range_proof,
                })
            }
            TYPE_DATA => {
                let v_data = varint::decode_bytes(bytes, offset)?;
                Ok(Output::Data { v_data })
            }
            other => Err(Error::UnknownOutputType(other)),
        }
    }
}

fn read_u64(bytes: &[u8], offset: &mut usize) -> Result<u64> {
    let end = *offset + 8;
    let slice: [u8; 8] = bytes
        .get(*offset..end)
        .ok_or(Error::UnexpectedEof("output value"))?
        .try_into()
        .unwrap();
    *offset = end;
    Ok(u64::from_le_bytes(slice))
}

fn read_33(bytes: &[u8], offset: &mut usize) -> Result<[u8; 33]> {
    let end = *offset + 33;
    let slice: [u8; 33] = bytes
        .get(*offset..end)
        .ok_or(Error::UnexpectedEof("33-byte point"))?
        .try_into()
        .unwrap();
    *offset = end;
    Ok(slice)
}

fn read_commitment(bytes: &[u8], offset: &mut usize) -> Result<Commitment> {
    let raw = read_33(bytes, offset)?;
    Ok(Commitment::from_bytes(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_crypto_ring_signature::pedersen_commit;
    use sv_crypto_keys::Scalar;

    #[test]
    fn standard_output_roundtrips() {
        let output = Output::Standard {
            value: 12345,
            script_pubkey: vec![0xaa; 25],
        };
        let mut buf = Vec::new();
        output.serialize_full(&mut buf);
        let mut offset = 0;
        let parsed = Output::parse_full(&buf, &mut offset).unwrap();
        assert_eq!(offset, buf.len());
        match parsed {
            Output::Standard { value, script_pubkey } => {
                assert_eq!(value, 12345);
                assert_eq!(script_pubkey, vec![0xaa; 25]);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn fee_output_encodes_marker_and_leb128() {
        let output = Output::fee(1234);
        if let Output::Data { v_data } = &output {
            assert_eq!(v_data[0], DO_FEE);
        } else {
            panic!("fee must be a Data output");
        }
    }

    #[test]
    fn ringct_output_roundtrips() {
        let blind = Scalar::random(&mut rand::rngs::OsRng);
        let commitment = pedersen_commit(500, &blind).unwrap();
        let output = Output::RingCt {
            dest_pub: [0x02; 33],
            commitment,
            v_data: vec![1, 2, 3],
            range_proof: vec![9; 40],
        };
        let mut buf = Vec::new();
        output.serialize_full(&mut buf);
        let mut offset = 0;
        let parsed = Output::parse_full(&buf, &mut offset).unwrap();
        assert_eq!(offset, buf.len());
        assert!(matches!(parsed, Output::RingCt { .. }));
    }

    #[test]
    fn unknown_type_byte_is_rejected() {
        let bytes = [0xff, 0x00];
        let mut offset = 0;
        assert!(Output::parse_full(&bytes, &mut offset).is_err());
    }
}
