use sv_crypto_ring_signature::{Commitment, MlsagSignature};
use sv_transaction_types::{leb128_codec, ScriptStack};

/// Encodes one input's `scriptWitness` (§4.4 "Witness encoding"):
/// `stack[0]` is the LEB128-encoded ring-member indices concatenated with
/// no length prefix between them (the outer stack serializer already
/// length-prefixes the item itself); `stack[1]` is the MLSAG blob — the
/// challenge `c0` followed by the response matrix `s`, with the
/// split-commitment appended for multi-input transactions.
pub fn encode_mlsag_witness(
    ring_indices: &[u64],
    signature: &MlsagSignature,
    split_commitment: Option<Commitment>,
) -> ScriptStack {
    let mut indices_blob = Vec::with_capacity(ring_indices.len() * 2);
    for &index in ring_indices {
        leb128_codec::encode(index, &mut indices_blob);
    }

    let mut mlsag_blob = Vec::new();
    mlsag_blob.extend_from_slice(signature.challenge.as_bytes());
    for row in &signature.responses {
        for response in row {
            mlsag_blob.extend_from_slice(response.as_bytes());
        }
    }
    if let Some(commit) = split_commitment {
        mlsag_blob.extend_from_slice(&commit.to_bytes());
    }

    ScriptStack::new(vec![indices_blob, mlsag_blob])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use sv_crypto_keys::{derive_pub, Scalar};
    use sv_crypto_ring_signature::{generate_mlsag, pedersen_commit, RingMember};

    fn sample_signature() -> MlsagSignature {
        let sk = Scalar::random(&mut OsRng);
        let pk = derive_pub(&sk).unwrap();
        let ring = vec![RingMember::from_pubkey(&pk)];
        generate_mlsag(&[ring], 0, &[sk], b"preimage").unwrap()
    }

    #[test]
    fn split_commitment_adds_33_bytes_to_the_blob() {
        let sig = sample_signature();
        let without = encode_mlsag_witness(&[1, 2], &sig, None);
        let commit = pedersen_commit(5, &Scalar::random(&mut OsRng)).unwrap();
        let with = encode_mlsag_witness(&[1, 2], &sig, Some(commit));
        assert_eq!(with.items[1].len(), without.items[1].len() + 33);
        assert_eq!(with.items[0], without.items[0]);
    }

    #[test]
    fn ring_indices_blob_has_no_length_prefix() {
        let sig = sample_signature();
        let witness = encode_mlsag_witness(&[300, 1], &sig, None);
        let mut expected = Vec::new();
        leb128_codec::encode(300, &mut expected);
        leb128_codec::encode(1, &mut expected);
        assert_eq!(witness.items[0], expected);
    }
}
