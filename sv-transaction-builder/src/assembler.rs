use crate::coin_selection::select_coins;
use crate::error::{Error, Result};
use crate::mlsag_driver::{sign_multi_input, sign_single_input};
use crate::ring_assembly::{assemble_ring, DecoyCandidate, DEFAULT_RING_SIZE};
use rand::Rng;
use std::collections::HashSet;
use sv_account_keys::StealthAddress;
use sv_crypto_keys::Scalar;
use sv_crypto_ring_signature::Commitment;
use sv_transaction_core::{build_fee_output, build_ringct_output, outputs_hash, txid};
use sv_transaction_types::{Output, Transaction, UtxoRingCt};

/// One RingCT send request: pay `amount` to `recipient`, return any
/// change to `change_address`, drawing real inputs from `utxos` and
/// decoys from `decoy_pool` (§4.4).
pub struct SendRequest<'a> {
    pub utxos: &'a [UtxoRingCt],
    pub recipient: &'a StealthAddress,
    pub amount: u64,
    pub change_address: &'a StealthAddress,
    pub decoy_pool: &'a [DecoyCandidate],
    pub ring_size: usize,
    pub fee_per_kb: u64,
}

impl<'a> SendRequest<'a> {
    pub fn new(
        utxos: &'a [UtxoRingCt],
        recipient: &'a StealthAddress,
        amount: u64,
        change_address: &'a StealthAddress,
        decoy_pool: &'a [DecoyCandidate],
    ) -> Self {
        Self {
            utxos,
            recipient,
            amount,
            change_address,
            decoy_pool,
            ring_size: DEFAULT_RING_SIZE,
            fee_per_kb: 1000,
        }
    }
}

pub struct BuiltTransaction {
    pub transaction: Transaction,
    pub txid: [u8; 32],
    pub fee: u64,
}

fn commitment_of(output: &Output) -> Commitment {
    match output {
        Output::RingCt { commitment, .. } => *commitment,
        Output::Ct { commitment, .. } => *commitment,
        _ => unreachable!("only value-carrying outputs are asked for their commitment"),
    }
}

/// Drives one send through the assembler's state machine (§4.4 "State
/// machine (per transaction build)"):
/// `Init -> Validated -> Selected -> OutputsBuilt -> InputsAssembled ->
/// Signed -> Serialized`. Any stage returns a typed [`Error`] on failure;
/// there is no partial commit — the caller either gets a fully signed,
/// self-verified transaction or nothing.
pub fn build_send(request: &SendRequest, rng: &mut impl Rng) -> Result<BuiltTransaction> {
    if !(3..=32).contains(&request.ring_size) {
        return Err(Error::InvalidRingSize(request.ring_size));
    }

    // Selected.
    const N_OUTPUTS: usize = 3; // fee, recipient, change
    let selection = select_coins(
        request.utxos,
        request.amount,
        request.fee_per_kb,
        request.ring_size,
        N_OUTPUTS,
        rng,
    )?;
    let total_in: u64 = selection.selected.iter().map(|u| u.amount).sum();
    let change_amount = total_in
        .checked_sub(request.amount)
        .and_then(|v| v.checked_sub(selection.fee))
        .ok_or(Error::InsufficientFunds {
            needed: request.amount + selection.fee,
            available: total_in,
        })?;

    // OutputsBuilt.
    let recipient_draft = build_ringct_output(request.recipient, request.amount, rng)?;
    let change_draft = build_ringct_output(request.change_address, change_amount, rng)?;
    let (fee_output, fee_commitment) = build_fee_output(selection.fee);

    let mut tx = Transaction::new(1, 0, 0);
    tx.outputs.push(fee_output);
    tx.outputs.push(recipient_draft.output.clone());
    tx.outputs.push(change_draft.output.clone());

    let preimage = outputs_hash(&tx.outputs);
    let out_commitments = vec![
        fee_commitment,
        commitment_of(&recipient_draft.output),
        commitment_of(&change_draft.output),
    ];
    let output_blinds = vec![Scalar::zero(), recipient_draft.blind.clone(), change_draft.blind.clone()];

    // InputsAssembled.
    let mut used_pubkeys = Vec::with_capacity(selection.selected.len());
    let mut used_decoy_indices = HashSet::new();
    let mut rings = Vec::with_capacity(selection.selected.len());
    for utxo in &selection.selected {
        let ring = assemble_ring(
            utxo,
            request.decoy_pool,
            request.ring_size,
            &used_pubkeys,
            &mut used_decoy_indices,
            rng,
        )?;
        used_pubkeys.push(utxo.pubkey);
        rings.push(ring);
    }

    // Signed.
    let signed_inputs = if selection.selected.len() == 1 {
        let utxo = &selection.selected[0];
        vec![sign_single_input(
            &rings[0],
            &utxo.blind,
            &utxo.dest_secret,
            utxo.key_image,
            &out_commitments,
            &output_blinds,
            &preimage,
        )?]
    } else {
        let input_blinds: Vec<Scalar> = selection.selected.iter().map(|u| u.blind.clone()).collect();
        let dest_secrets: Vec<Scalar> = selection.selected.iter().map(|u| u.dest_secret.clone()).collect();
        let key_images = selection.selected.iter().map(|u| u.key_image).collect::<Vec<_>>();
        let input_values: Vec<u64> = selection.selected.iter().map(|u| u.amount).collect();
        sign_multi_input(
            &rings,
            &input_blinds,
            &dest_secrets,
            &key_images,
            &input_values,
            &output_blinds,
            &preimage,
            rng,
        )?
    };

    for signed in signed_inputs {
        tx.inputs.push(signed.input);
        tx.witness.push(signed.witness);
    }
    tx.has_witness = true;

    // Serialized.
    let id = txid(&tx)?;
    Ok(BuiltTransaction {
        transaction: tx,
        txid: id,
        fee: selection.fee,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use sv_account_keys::Wallet;
    use sv_crypto_keys::derive_pub;
    use sv_crypto_ring_signature::{pedersen_commit, KeyImage};

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
    fn single_input_send_produces_three_outputs_and_a_valid_txid() {
        let utxos = vec![utxo(2_000_000_000, 42)];
        let recipient = Wallet::create(&mut OsRng).unwrap();
        let change = Wallet::create(&mut OsRng).unwrap();
        let pool = decoy_pool(20);

        let request = SendRequest::new(&utxos, &recipient.stealth_address, 1_000_000_000, &change.stealth_address, &pool);
        let built = build_send(&request, &mut OsRng).unwrap();

        assert_eq!(built.transaction.outputs.len(), 3);
        assert!(matches!(built.transaction.outputs[0], Output::Data { .. }));
        assert_eq!(built.transaction.inputs.len(), 1);
        assert!(built.transaction.has_witness);

        let reserialized = built.transaction.serialize().unwrap();
        let mut expected = sv_crypto_keys::double_sha256(&reserialized);
        expected.reverse();
        assert_eq!(built.txid, expected);
    }

    #[test]
    fn multi_input_send_signs_every_input() {
        let utxos = vec![utxo(2_000_000_000, 1), utxo(1_500_000_000, 2)];
        let recipient = Wallet::create(&mut OsRng).unwrap();
        let change = Wallet::create(&mut OsRng).unwrap();
        let pool = decoy_pool(30);

        let request = SendRequest::new(&utxos, &recipient.stealth_address, 3_000_000_000, &change.stealth_address, &pool);
        let built = build_send(&request, &mut OsRng).unwrap();

        assert_eq!(built.transaction.inputs.len(), 2);
        assert_eq!(built.transaction.witness.len(), 2);
        for witness in &built.transaction.witness {
            // challenge (32B) + >=1 response row + 33B split commitment.
            assert!(witness.items[1].len() > 32 + 33);
        }
    }
}
