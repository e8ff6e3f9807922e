use sv_crypto_keys::double_sha256;
use sv_transaction_types::Output;

/// Computes the outputs-hash MLSAG preimage (§4.4): an iterative digest
/// folding each output's type-less payload into a running hash, in
/// transaction order. The fee `OUTPUT_DATA` participates like any other
/// output. Every input's MLSAG signs this same value.
pub fn outputs_hash(outputs: &[Output]) -> [u8; 32] {
    let mut h = [0u8; 32];
    for output in outputs {
        let mut payload = Vec::new();
        output.serialize_payload(&mut payload);
        let dsh = double_sha256(&payload);
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(&dsh);
        buf.extend_from_slice(&h);
        h = double_sha256(&buf);
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reordering_outputs_changes_the_preimage() {
        let a = Output::Standard {
            value: 1,
            script_pubkey: vec![1],
        };
        let b = Output::Standard {
            value: 2,
            script_pubkey: vec![2],
        };
        let forward = outputs_hash(&[a.clone(), b.clone()]);
        let backward = outputs_hash(&[b, a]);
        assert_ne!(forward, backward);
    }

    #[test]
    fn equal_orderings_produce_equal_preimages() {
        let outputs = vec![
            Output::fee(10),
            Output::Standard {
                value: 5,
                script_pubkey: vec![9, 9],
            },
        ];
        assert_eq!(outputs_hash(&outputs), outputs_hash(&outputs.clone()));
    }

    #[test]
    fn empty_outputs_hash_to_zero() {
        assert_eq!(outputs_hash(&[]), [0u8; 32]);
    }
}
