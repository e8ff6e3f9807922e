use crate::error::Result;
use crate::rangeproof_params;
use rand::Rng;
use sv_account_keys::{derive_destination, StealthAddress};
use sv_crypto_keys::{rangeproof_nonce, Scalar};
use sv_crypto_ring_signature::{
    pedersen_commit, pedersen_commit_zero_blind, Commitment, RangeProof, RangeProofParams,
};
use sv_transaction_types::Output;

/// Owns `(variant, blind)` during construction, consumed into the
/// finalized wire `Output` at serialization time (§9 redesign note: "side
/// carried blind on output values during assembly").
#[derive(Debug, Clone)]
pub struct OutputDraft {
    pub output: Output,
    pub value: u64,
    pub blind: Scalar,
}

/// Builds one RingCT output for `recipient` (§4.3 "RingCT output
/// construction"): derives the ephemeral/destination keys, commits to
/// `value` under a fresh blind, signs a range proof bound to a nonce
/// derived from the double-hashed ECDH (the rewindable nonce, distinct
/// from the stealth shared secret per §9), and emits `vData = ephemeralPub`.
pub fn build_ringct_output(recipient: &StealthAddress, value: u64, rng: &mut impl Rng) -> Result<OutputDraft> {
    let ephemeral_secret = Scalar::random(rng);
    let ephemeral = derive_destination(recipient, ephemeral_secret)?;

    let blind = Scalar::random(rng);
    let commitment = pedersen_commit(value, &blind)?;

    let nonce = rangeproof_nonce(&ephemeral.dest_pub, &ephemeral.ephemeral_secret)?;
    let params = rangeproof_params::select_params(value, rng);
    let proof_params = RangeProofParams {
        exponent: params.exponent,
        bit_count: params.min_bits,
    };
    let proof = RangeProof::sign(value, &blind, &nonce, proof_params)?;

    let output = Output::RingCt {
        dest_pub: ephemeral.dest_pub.to_bytes(),
        commitment,
        v_data: ephemeral.ephemeral_public.to_bytes().to_vec(),
        range_proof: proof.to_bytes(),
    };

    Ok(OutputDraft { output, value, blind })
}

/// Builds the transaction's fee `OUTPUT_DATA` and its zero-blind
/// commitment for the MLSAG's output-commitment vector (§4.3, §4.4).
pub fn build_fee_output(fee: u64) -> (Output, Commitment) {
    (Output::fee(fee), pedersen_commit_zero_blind(fee))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use sv_account_keys::Wallet;

    #[test]
    fn ringct_output_has_correct_commitment_and_proof() {
        let wallet = Wallet::create(&mut OsRng).unwrap();
        let draft = build_ringct_output(&wallet.stealth_address, 77_000, &mut OsRng).unwrap();
        if let Output::RingCt {
            commitment,
            v_data,
            range_proof,
            ..
        } = &draft.output
        {
            assert_eq!(v_data.len(), 33);
            let proof = RangeProof::from_bytes(range_proof).unwrap();
            assert!(proof.verify(commitment).is_ok());
        } else {
            panic!("expected a RingCt output");
        }
    }

    #[test]
    fn fee_output_commitment_has_zero_blind_component() {
        let (output, commitment) = build_fee_output(1234);
        let expected = pedersen_commit_zero_blind(1234);
        assert_eq!(commitment, expected);
        assert!(matches!(output, Output::Data { .. }));
    }
}
