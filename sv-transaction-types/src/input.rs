use crate::error::{Error, Result};
use crate::varint;

/// The fixed `prevout.n` value that marks a RingCT-spending input: the
/// real outpoint hash field is repurposed to carry the MLSAG shape instead
/// (§3).
pub const ANON_MARKER: u32 = 0xffff_ffa0;

/// A reference to a previous output. For RingCT-spending inputs this is
/// not a real outpoint: `hash`'s first 8 bytes encode
/// `(nInputsInMlsag:u32LE, ringSize:u32LE)` with the rest zeroed, and `n`
/// is always [`ANON_MARKER`] (§3).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct OutPoint {
    pub hash: [u8; 32],
    pub n: u32,
}

impl OutPoint {
    pub fn conventional(txid: [u8; 32], vout: u32) -> Self {
        Self { hash: txid, n: vout }
    }

    /// Builds the synthetic `prevout` for a RingCT-spending input carrying
    /// the MLSAG's input count and ring size (§3, §4.4).
    pub fn anon_marker(n_inputs_in_mlsag: u32, ring_size: u32) -> Self {
        let mut hash = [0u8; 32];
        hash[0..4].copy_from_slice(&n_inputs_in_mlsag.to_le_bytes());
        hash[4..8].copy_from_slice(&ring_size.to_le_bytes());
        Self { hash, n: ANON_MARKER }
    }

    pub fn is_anon(&self) -> bool {
        self.n == ANON_MARKER
    }

    /// Decodes `(nInputsInMlsag, ringSize)` from an anon-marker `prevout`.
    pub fn anon_shape(&self) -> Option<(u32, u32)> {
        if !self.is_anon() {
            return None;
        }
        let n_inputs = u32::from_le_bytes(self.hash[0..4].try_into().unwrap());
        let ring_size = u32::from_le_bytes(self.hash[4..8].try_into().unwrap());
        Some((n_inputs, ring_size))
    }
}

/// A generic stack of byte strings, used for both `scriptData` (the
/// key-image push on RingCT inputs) and `scriptWitness` (the ring-index
/// and MLSAG blob, §3, §4.4).
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ScriptStack {
    pub items: Vec<Vec<u8>>,
}

impl ScriptStack {
    pub fn new(items: Vec<Vec<u8>>) -> Self {
        Self { items }
    }

    pub fn serialize(&self, out: &mut Vec<u8>) {
        varint::encode(self.items.len() as u64, out);
        for item in &self.items {
            varint::encode_bytes(item, out);
        }
    }

    pub fn parse(bytes: &[u8], offset: &mut usize) -> Result<Self> {
        let count = varint::decode(bytes, offset)?;
        let mut items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            items.push(varint::decode_bytes(bytes, offset)?);
        }
        Ok(Self { items })
    }
}

/// One transaction input (§3). `script_data` is only present on
/// RingCT-spending inputs (`prevout.is_anon()`); the key image is its
/// first stack item.
#[derive(Debug, Clone)]
pub struct Input {
    pub prevout: OutPoint,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
    pub script_data: Option<ScriptStack>,
}

impl Input {
    pub fn serialize(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.prevout.hash);
        out.extend_from_slice(&self.prevout.n.to_le_bytes());
        varint::encode_bytes(&self.script_sig, out);
        out.extend_from_slice(&self.sequence.to_le_bytes());
        if self.prevout.is_anon() {
            self.script_data
                .as_ref()
                .expect("anon-marker input must carry scriptData")
                .serialize(out);
        }
    }

    pub fn parse(bytes: &[u8], offset: &mut usize) -> Result<Self> {
        let hash = read_32(bytes, offset)?;
        let n = read_u32(bytes, offset)?;
        let prevout = OutPoint { hash, n };
        let script_sig = varint::decode_bytes(bytes, offset)?;
        let sequence = read_u32(bytes, offset)?;
        let script_data = if prevout.is_anon() {
            Some(ScriptStack::parse(bytes, offset)?)
        } else {
            None
        };
        Ok(Self {
            prevout,
            script_sig,
            sequence,
            script_data,
        })
    }

    pub fn key_image_bytes(&self) -> Option<&[u8]> {
        self.script_data.as_ref()?.items.first().map(|v| v.as_slice())
    }
}

fn read_32(bytes: &[u8], offset: &mut usize) -> Result<[u8; 32]> {
    let end = *offset + 32;
    let slice: [u8; 32] = bytes
        .get(*offset..end)
        .ok_or(Error::UnexpectedEof("prevout hash"))?
        .try_into()
        .unwrap();
    *offset = end;
    Ok(slice)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anon_marker_round_trips_shape() {
        let prevout = OutPoint::anon_marker(1, 11);
        assert!(prevout.is_anon());
        assert_eq!(prevout.anon_shape(), Some((1, 11)));
    }

    #[test]
    fn ct_input_round_trips_without_script_data() {
        let input = Input {
            prevout: OutPoint::conventional([7u8; 32], 3),
            script_sig: vec![1, 2, 3],
            sequence: 0xffff_ffff,
            script_data: None,
        };
        let mut buf = Vec::new();
        input.serialize(&mut buf);
        let mut offset = 0;
        let parsed = Input::parse(&buf, &mut offset).unwrap();
        assert_eq!(offset, buf.len());
        assert_eq!(parsed.prevout, input.prevout);
        assert_eq!(parsed.script_sig, input.script_sig);
    }

    #[test]
    fn ringct_input_round_trips_with_script_data() {
        let input = Input {
            prevout: OutPoint::anon_marker(1, 11),
            script_sig: Vec::new(),
            sequence: 0,
            script_data: Some(ScriptStack::new(vec![vec![0x02; 33]])),
        };
        let mut buf = Vec::new();
        input.serialize(&mut buf);
        let mut offset = 0;
        let parsed = Input::parse(&buf, &mut offset).unwrap();
        assert_eq!(offset, buf.len());
        assert_eq!(parsed.key_image_bytes(), Some(&[0x02; 33][..]));
    }
}
