//! Bitcoin-style compact-size length prefix (§4.5 "Varint"), distinct from
//! the LEB128 encoding used for ring indices and the fee value.

use crate::error::{Error, Result};

pub fn encode(value: u64, out: &mut Vec<u8>) {
    if value < 0xfd {
        out.push(value as u8);
    } else if value <= 0xffff {
        out.push(0xfd);
        out.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= 0xffff_ffff {
        out.push(0xfe);
        out.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        out.push(0xff);
        out.extend_from_slice(&value.to_le_bytes());
    }
}

pub fn decode(bytes: &[u8], offset: &mut usize) -> Result<u64> {
    let tag = *bytes.get(*offset).ok_or(Error::UnexpectedEof("varint tag"))?;
    *offset += 1;
    match tag {
        0xfd => {
            let v = read_u16(bytes, offset)? as u64;
            if v < 0xfd {
                return Err(Error::NonMinimalVarint);
            }
            Ok(v)
        }
        0xfe => {
            let v = read_u32(bytes, offset)? as u64;
            if v <= 0xffff {
                return Err(Error::NonMinimalVarint);
            }
            Ok(v)
        }
        0xff => {
            let v = read_u64(bytes, offset)?;
            if v <= 0xffff_ffff {
                return Err(Error::NonMinimalVarint);
            }
            Ok(v)
        }
        small => Ok(small as u64),
    }
}

/// Encodes a length-prefixed byte string: varint length, then the bytes.
pub fn encode_bytes(data: &[u8], out: &mut Vec<u8>) {
    encode(data.len() as u64, out);
    out.extend_from_slice(data);
}

pub fn decode_bytes(bytes: &[u8], offset: &mut usize) -> Result<Vec<u8>> {
    let len = decode(bytes, offset)? as usize;
    let end = offset
        .checked_add(len)
        .filter(|&e| e <= bytes.len())
        .ok_or(Error::UnexpectedEof("length-prefixed bytes"))?;
    let out = bytes[*offset..end].to_vec();
    *offset = end;
    Ok(out)
}

fn read_u16(bytes: &[u8], offset: &mut usize) -> Result<u16> {
    let end = *offset + 2;
    let slice: [u8; 2] = bytes
        .get(*offset..end)
        .ok_or(Error::UnexpectedEof("u16"))?
        .try_into()
        .unwrap();
    *offset = end;
    Ok(u16::from_le_bytes(slice))
}

fn read_u32(bytes: &[u8], offset: &mut usize) -> Result<u32> {
    let end = *offset + 4;
    let slice: [u8; 4] = bytes
        .get(*offset..end)
        .ok_or(Error::UnexpectedEof("u32"))?
        .try_into()
        .unwrap();
    *offset = end;
    Ok(u32::from_le_bytes(slice))
}

fn read_u64(bytes: &[u8], offset: &mut usize) -> Result<u64> {
    let end = *offset + 8;
    let slice: [u8; 8] = bytes
        .get(*offset..end)
        .ok_or(Error::UnexpectedEof("u64"))?
        .try_into()
        .unwrap();
    *offset = end;
    Ok(u64::from_le_bytes(slice))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: u64) {
        let mut buf = Vec::new();
        encode(value, &mut buf);
        let mut offset = 0;
        assert_eq!(decode(&buf, &mut offset).unwrap(), value);
        assert_eq!(offset, buf.len());
    }

    #[test]
    fn roundtrips_boundary_values() {
        for v in [0, 1, 0xfc, 0xfd, 0xfe, 0xffff, 0x1_0000, 0xffff_ffff, 0x1_0000_0000, u64::MAX] {
            roundtrip(v);
        }
    }

    #[test]
    fn rejects_non_minimal_encoding() {
        let bytes = [0xfd, 0x05, 0x00]; // encodes 5, which should have used a 1-byte tag
        let mut offset = 0;
        assert!(decode(&bytes, &mut offset).is_err());
    }

    proptest::proptest! {
        #[test]
        fn roundtrips_arbitrary_values(value: u64) {
            roundtrip(value);
        }

        #[test]
        fn roundtrips_arbitrary_byte_strings(data: Vec<u8>) {
            let mut buf = Vec::new();
            encode_bytes(&data, &mut buf);
            let mut offset = 0;
            let decoded = decode_bytes(&buf, &mut offset).unwrap();
            assert_eq!(decoded, data);
            assert_eq!(offset, buf.len());
        }
    }
}
