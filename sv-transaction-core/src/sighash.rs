use sv_crypto_keys::double_sha256;
use sv_transaction_types::{varint, Transaction};

pub const SIGHASH_ALL: i32 = 0x01;

/// The standard Bitcoin-legacy sighash preimage (§4.5 "Legacy CT
/// sighash"), used to sign CT-spending inputs during a CT→RingCT convert.
/// The input at `sign_index` has its `scriptCode` (the spent output's
/// `scriptPubKey`) substituted for its `scriptSig`; every other input's
/// script field is emptied.
pub fn legacy_sighash(tx: &Transaction, sign_index: usize, script_code: &[u8], sighash_type: i32) -> [u8; 32] {
    let mut out = Vec::with_capacity(256);
    out.extend_from_slice(&(tx.version as i32).to_le_bytes());

    varint::encode(tx.inputs.len() as u64, &mut out);
    for (i, input) in tx.inputs.iter().enumerate() {
        out.extend_from_slice(&input.prevout.hash);
        out.extend_from_slice(&input.prevout.n.to_le_bytes());
        if i == sign_index {
            varint::encode_bytes(script_code, &mut out);
        } else {
            varint::encode_bytes(&[], &mut out);
        }
        out.extend_from_slice(&input.sequence.to_le_bytes());
    }

    varint::encode(tx.outputs.len() as u64, &mut out);
    for output in &tx.outputs {
        output.serialize_payload(&mut out);
    }

    out.extend_from_slice(&tx.lock_time.to_le_bytes());
    out.extend_from_slice(&sighash_type.to_le_bytes());

    double_sha256(&out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_transaction_types::{Input, OutPoint, Output};

    fn sample_tx() -> Transaction {
        let mut tx = Transaction::new(1, 0, 0);
        tx.inputs.push(Input {
            prevout: OutPoint::conventional([3u8; 32], 1),
            script_sig: Vec::new(),
            sequence: 0xffff_ffff,
            script_data: None,
        });
        tx.outputs.push(Output::Standard {
            value: 1000,
            script_pubkey: vec![0xaa; 25],
        });
        tx
    }

    #[test]
    fn sighash_depends_on_the_substituted_script_code() {
        let tx = sample_tx();
        let h1 = legacy_sighash(&tx, 0, &[0x76, 0xa9], SIGHASH_ALL);
        let h2 = legacy_sighash(&tx, 0, &[0x76, 0xa9, 0x14], SIGHASH_ALL);
        assert_ne!(h1, h2);
    }

    #[test]
    fn sighash_is_deterministic() {
        let tx = sample_tx();
        let h1 = legacy_sighash(&tx, 0, &[1, 2, 3], SIGHASH_ALL);
        let h2 = legacy_sighash(&tx, 0, &[1, 2, 3], SIGHASH_ALL);
        assert_eq!(h1, h2);
    }
}
