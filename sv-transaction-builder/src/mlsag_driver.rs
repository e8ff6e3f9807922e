use crate::error::{Error, Result};
use crate::ring_assembly::AssembledRing;
use crate::witness::encode_mlsag_witness;
use rand::Rng;
use sv_crypto_keys::{derive_pub, Scalar};
use sv_crypto_ring_signature::{
    generate_mlsag, pedersen_blind_sum, pedersen_commit, prepare_mlsag, verify_mlsag, Commitment, KeyImage, RingMember,
};
use sv_transaction_types::{Input, ScriptStack};

/// One fully signed RingCT-spending input, ready to push into the
/// transaction's `inputs`/`witness` vectors (§4.4).
pub struct SignedInput {
    pub input: Input,
    pub witness: ScriptStack,
}

/// Signs one input's MLSAG against a commitment row that balances the
/// real UTXO's commitment against `out_commitments` (§4.4 "Single-input
/// MLSAG"). Used directly for single-input transactions, and reused
/// per-input by [`sign_multi_input`] with the per-input split commitment
/// standing in for `out_commitments`.
#[allow(clippy::too_many_arguments)]
pub fn sign_one_input(
    ring: &AssembledRing,
    input_blind: &Scalar,
    dest_secret: &Scalar,
    key_image: KeyImage,
    out_commitments: &[Commitment],
    output_blinds: &[Scalar],
    preimage: &[u8],
    split_commitment: Option<Commitment>,
) -> Result<SignedInput> {
    if derive_pub(dest_secret)? != ring.pubkeys[ring.real_index] {
        return Err(Error::DestinationMismatch);
    }

    let (commitment_row, sk) = prepare_mlsag(&ring.commitments, out_commitments, input_blind, output_blinds)?;
    let pubkey_row: Vec<RingMember> = ring.pubkeys.iter().map(RingMember::from_pubkey).collect();
    let columns = vec![pubkey_row, commitment_row];

    let sig = generate_mlsag(&columns, ring.real_index, &[dest_secret.clone(), sk], preimage)?;
    verify_mlsag(&columns, &sig, preimage).map_err(|_| Error::MlsagInvalid)?;

    let script_data = ScriptStack::new(vec![key_image.to_bytes().to_vec()]);
    let witness = encode_mlsag_witness(&ring.ring_indices, &sig, split_commitment);

    let input = Input {
        prevout: ring.prevout,
        script_sig: Vec::new(),
        sequence: 0xffff_ffff,
        script_data: Some(script_data),
    };

    Ok(SignedInput { input, witness })
}

/// Single-input MLSAG driver (§4.4): the commitment row balances the real
/// input against `[feeCommitment, ...outputCommitments]` directly, no
/// split-commitment indirection needed.
pub fn sign_single_input(
    ring: &AssembledRing,
    input_blind: &Scalar,
    dest_secret: &Scalar,
    key_image: KeyImage,
    out_commitments: &[Commitment],
    output_blinds: &[Scalar],
    preimage: &[u8],
) -> Result<SignedInput> {
    sign_one_input(
        ring,
        input_blind,
        dest_secret,
        key_image,
        out_commitments,
        output_blinds,
        preimage,
        None,
    )
}

/// Multi-input split-commitment MLSAG driver (§4.4 "Multi-input MLSAG"):
/// every input but the last draws a random `splitBlind`; the last input's
/// `splitBlind` is the one value that forces
/// `Σ splitBlinds == Σ outputBlinds` (`outputBlinds` here meaning
/// `[feeBlind, ...outputBlinds]`), so the split commitments balance the
/// real output sum once rewritten. Each input is then signed exactly as
/// a single-input MLSAG against its own `splitCommit`, with the 33-byte
/// split commitment appended to its witness blob.
pub fn sign_multi_input(
    rings: &[AssembledRing],
    input_blinds: &[Scalar],
    dest_secrets: &[Scalar],
    key_images: &[KeyImage],
    input_values: &[u64],
    output_blinds: &[Scalar],
    preimage: &[u8],
    rng: &mut impl Rng,
) -> Result<Vec<SignedInput>> {
    let n = rings.len();
    if n < 2 {
        return Err(Error::NoInputs);
    }
    if input_blinds.len() != n || dest_secrets.len() != n || key_images.len() != n || input_values.len() != n {
        return Err(Error::NoInputs);
    }

    let mut split_blinds = Vec::with_capacity(n);
    for _ in 0..n - 1 {
        split_blinds.push(Scalar::random(rng));
    }
    let last_blind = pedersen_blind_sum(output_blinds, &split_blinds)?;
    split_blinds.push(last_blind);

    let mut signed = Vec::with_capacity(n);
    for i in 0..n {
        let split_commit = pedersen_commit(input_values[i], &split_blinds[i])?;
        let out = sign_one_input(
            &rings[i],
            &input_blinds[i],
            &dest_secrets[i],
            key_images[i],
            &[split_commit],
            &[split_blinds[i].clone()],
            preimage,
            Some(split_commit),
        )?;
        signed.push(out);
    }

    Ok(signed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring_assembly::{assemble_ring, DecoyCandidate};
    use rand::rngs::OsRng;
    use sv_crypto_keys::{derive_pub, sha256};
    use sv_crypto_ring_signature::pedersen_commit;
    use sv_transaction_types::UtxoRingCt;
    use std::collections::HashSet;

    fn utxo(amount: u64, ringct_index: u64) -> UtxoRingCt {
        let sk = Scalar::random(&mut OsRng);
        let pubkey = derive_pub(&sk).unwrap();
        let blind = Scalar::random(&mut OsRng);
        let commitment = pedersen_commit(amount, &blind).unwrap();
        let key_image = KeyImage::compute(&sk, &pubkey).unwrap();
        UtxoRingCt {
            txid: [0u8; 32],
            vout: 0,
            pubkey,
            commitment,
            amount,
            blind,
            dest_secret: sk,
            key_image,
            ringct_index,
            spent: false,
        }
    }

    fn decoy_pool(n: usize) -> Vec<DecoyCandidate> {
        (0..n)
            .map(|i| {
                let sk = Scalar::random(&mut OsRng);
                DecoyCandidate {
                    pubkey: derive_pub(&sk).unwrap(),
                    commitment: pedersen_commit(1, &Scalar::random(&mut OsRng)).unwrap(),
                    ringct_index: 1000 + i as u64,
                }
            })
            .collect()
    }

    #[test]
    fn single_input_mlsag_signs_and_verifies() {
        let real = utxo(2_000_000_000, 7);
        let pool = decoy_pool(20);
        let mut used = HashSet::new();
        let ring = assemble_ring(&real, &pool, 11, &[], &mut used, &mut OsRng).unwrap();

        let output_blind = Scalar::random(&mut OsRng);
        let output_commitment = pedersen_commit(1_000_000_000, &output_blind).unwrap();
        let fee_commitment = pedersen_commit(0, &Scalar::zero()).unwrap();
        let preimage = sha256(b"tx-preimage");

        let signed = sign_single_input(
            &ring,
            &real.blind,
            &real.dest_secret,
            real.key_image,
            &[fee_commitment, output_commitment],
            &[Scalar::zero(), output_blind],
            &preimage,
        )
        .unwrap();

        assert_eq!(signed.witness.items.len(), 2);
        assert_eq!(signed.input.script_data.unwrap().items[0], real.key_image.to_bytes().to_vec());
    }

    #[test]
    fn multi_input_blob_is_33_bytes_longer_than_single_input() {
        let real1 = utxo(2_000_000_000, 7);
        let real2 = utxo(1_000_000_000, 8);
        let pool = decoy_pool(30);
        let mut used = HashSet::new();
        let ring1 = assemble_ring(&real1, &pool, 11, &[real2.pubkey], &mut used, &mut OsRng).unwrap();
        let ring2 = assemble_ring(&real2, &pool, 11, &[real1.pubkey], &mut used, &mut OsRng).unwrap();

        let output_blind = Scalar::random(&mut OsRng);
        let output_value = real1.amount + real2.amount - 1000;
        let output_commitment = pedersen_commit(output_value, &output_blind).unwrap();
        let fee_blind = Scalar::zero();
        let preimage = sha256(b"tx-preimage-multi");

        let signed = sign_multi_input(
            &[ring1.clone(), ring2.clone()],
            &[real1.blind.clone(), real2.blind.clone()],
            &[real1.dest_secret.clone(), real2.dest_secret.clone()],
            &[real1.key_image, real2.key_image],
            &[real1.amount, real2.amount],
            &[fee_blind, output_blind],
            &preimage,
            &mut OsRng,
        )
        .unwrap();

        assert_eq!(signed.len(), 2);

        let single = sign_single_input(
            &ring1,
            &real1.blind,
            &real1.dest_secret,
            real1.key_image,
            &[pedersen_commit(0, &Scalar::zero()).unwrap(), output_commitment],
            &[Scalar::zero(), output_blind],
            &preimage,
        )
        .unwrap();

        assert_eq!(signed[0].witness.items[1].len(), single.witness.items[1].len() + 33);
    }
}
