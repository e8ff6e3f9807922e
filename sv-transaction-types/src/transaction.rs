use crate::error::{Error, Result};
use crate::input::{Input, ScriptStack};
use crate::output::Output;
use crate::varint;

/// A complete transaction (§3). If `has_witness`, exactly one witness
/// stack is carried per input (the assembler's invariant, §3, §4.4).
#[derive(Debug, Clone)]
pub struct Transaction {
    pub version: u8,
    pub tx_type: u8,
    pub has_witness: bool,
    pub lock_time: u32,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub witness: Vec<ScriptStack>,
}

impl Transaction {
    pub fn new(version: u8, tx_type: u8, lock_time: u32) -> Self {
        Self {
            version,
            tx_type,
            has_witness: false,
            lock_time,
            inputs: Vec::new(),
            outputs: Vec::new(),
            witness: Vec::new(),
        }
    }

    /// Full byte-exact wire encoding (§4.5 "Transaction layout").
    pub fn serialize(&self) -> Result<Vec<u8>> {
        if self.has_witness && self.witness.len() != self.inputs.len() {
            return Err(Error::UnexpectedEof("witness count must match input count"));
        }
        let mut out = Vec::with_capacity(256);
        out.push(self.version);
        out.push(self.tx_type);
        out.push(self.has_witness as u8);
        out.extend_from_slice(&self.lock_time.to_le_bytes());

        varint::encode(self.inputs.len() as u64, &mut out);
        for input in &self.inputs {
            input.serialize(&mut out);
        }

        varint::encode(self.outputs.len() as u64, &mut out);
        for output in &self.outputs {
            output.serialize_full(&mut out);
        }

        if self.has_witness {
            for stack in &self.witness {
                stack.serialize(&mut out);
            }
        }

        Ok(out)
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut offset = 0usize;
        let version = read_u8(bytes, &mut offset)?;
        let tx_type = read_u8(bytes, &mut offset)?;
        let has_witness = read_u8(bytes, &mut offset)? != 0;
        let lock_time = read_u32(bytes, &mut offset)?;

        let n_inputs = varint::decode(bytes, &mut offset)?;
        let mut inputs = Vec::with_capacity(n_inputs as usize);
        for _ in 0..n_inputs {
            inputs.push(Input::parse(bytes, &mut offset)?);
        }

        let n_outputs = varint::decode(bytes, &mut offset)?;
        let mut outputs = Vec::with_capacity(n_outputs as usize);
        for _ in 0..n_outputs {
            outputs.push(Output::parse_full(bytes, &mut offset)?);
        }

        let mut witness = Vec::new();
        if has_witness {
            for _ in 0..inputs.len() {
                witness.push(ScriptStack::parse(bytes, &mut offset)?);
            }
        }

        if offset != bytes.len() {
            return Err(Error::TrailingBytes);
        }

        Ok(Self {
            version,
            tx_type,
            has_witness,
            lock_time,
            inputs,
            outputs,
            witness,
        })
    }
}

fn read_u8(bytes: &[u8], offset: &mut usize) -> Result<u8> {
    let b = *bytes.get(*offset).ok_or(Error::UnexpectedEof("u8"))?;
    *offset += 1;
    Ok(b)
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
    use crate::input::OutPoint;

    #[test]
    fn empty_transaction_round_trips() {
        let tx = Transaction::new(1, 0, 0);
        let bytes = tx.serialize().unwrap();
        let parsed = Transaction::parse(&bytes).unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.inputs.len(), 0);
        assert_eq!(parsed.outputs.len(), 0);
    }

    #[test]
    fn transaction_with_ct_input_and_outputs_round_trips() {
        let mut tx = Transaction::new(1, 0, 500_000);
        tx.inputs.push(Input {
            prevout: OutPoint::conventional([1u8; 32], 0),
            script_sig: vec![0xde, 0xad],
            sequence: 0xffff_ffff,
            script_data: None,
        });
        tx.outputs.push(Output::Standard {
            value: 100,
            script_pubkey: vec![0xab; 25],
        });
        tx.outputs.push(Output::fee(10));

        let bytes = tx.serialize().unwrap();
        let parsed = Transaction::parse(&bytes).unwrap();
        assert_eq!(parsed.inputs.len(), 1);
        assert_eq!(parsed.outputs.len(), 2);
        assert_eq!(parsed.lock_time, 500_000);
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let tx = Transaction::new(1, 0, 0);
        let mut bytes = tx.serialize().unwrap();
        bytes.push(0xff);
        assert!(Transaction::parse(&bytes).is_err());
    }
}
