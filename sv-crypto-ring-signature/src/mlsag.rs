use crate::commitment::{pedersen_blind_sum, Commitment};
use crate::error::{Error, Result};
use crate::key_image::KeyImage;
use crate::scalar_ext::to_k256;
use sha2::{Digest, Sha256};
use sv_crypto_keys::{sha256, CurvePoint, Point, Scalar};

/// One ring-column entry for one MLSAG row: either a spend-key public
/// point (row 0) or a commitment-balance point (row 1), stored as raw
/// curve arithmetic since both rows are signed identically (§4.1, §4.4).
#[derive(Debug, Clone, Copy)]
pub struct RingMember(CurvePoint);

impl RingMember {
    pub fn from_pubkey(p: &Point) -> Self {
        Self(p.curve_point())
    }

    pub fn from_commitment(c: Commitment) -> Self {
        Self(c.inner())
    }
}

/// A generated MLSAG signature over a ring of decoy + real inputs,
/// producing one key image and one response scalar per ring column
/// (§4.4 single- and multi-input construction).
#[derive(Clone)]
pub struct MlsagSignature {
    pub key_images: Vec<KeyImage>,
    pub challenge: Scalar,
    pub responses: Vec<Vec<Scalar>>,
}

fn hash_to_scalar(label: &[u8], parts: &[&[u8]]) -> Result<Scalar> {
    let mut hasher = Sha256::new();
    hasher.update(label);
    for part in parts {
        hasher.update(part);
    }
    let digest: [u8; 32] = hasher.finalize().into();
    Scalar::from_canonical_bytes(digest)
        .or_else(|_| Scalar::from_canonical_bytes(sha256(&digest)).map_err(Error::from))
}

/// `prepareMlsag(inCommits, outCommits, inputBlind, outputBlinds) -> (row1, sk)`
/// (§4.1, §4.4): fills the MLSAG's second row with, for every ring column,
/// the net commitment `inCommits[col] - sum(outCommits)` that column would
/// have to zero out if it were the real spend, and returns the secret `sk`
/// that actually zeroes it out at the real column — the balancing blind
/// `inputBlind - sum(outputBlinds)`, which is exactly `pedersenBlindSum`
/// with the input blind as the lone positive term.
pub fn prepare_mlsag(
    in_commitments: &[Commitment],
    out_commitments: &[Commitment],
    input_blind: &Scalar,
    output_blinds: &[Scalar],
) -> Result<(Vec<RingMember>, Scalar)> {
    if in_commitments.is_empty() {
        return Err(Error::LengthMismatch(1, 0));
    }
    if out_commitments.is_empty() {
        return Err(Error::LengthMismatch(1, 0));
    }
    let mut sum_out = out_commitments[0];
    for c in &out_commitments[1..] {
        sum_out = sum_out.add(*c);
    }
    let row1 = in_commitments
        .iter()
        .map(|c| RingMember::from_commitment(c.sub(sum_out)))
        .collect();
    let sk = pedersen_blind_sum(std::slice::from_ref(input_blind), output_blinds)?;
    Ok((row1, sk))
}

/// `generateMlsag(columns, real_index, spend_keys, message)`:
/// produces a ring signature proving knowledge of the real spender's keys
/// in every row (column `real_index` of each), without revealing
/// `real_index`, and binds the signature to `message` (the transaction's
/// signing preimage hash, §4.4). `columns[row]` holds one ring of public
/// points; `spend_keys[row]` is the matching secret for `real_index` in
/// that row (row 0: the destination secret; row 1: the balancing secret
/// from `prepare_mlsag`).
pub fn generate_mlsag(
    columns: &[Vec<RingMember>],
    real_index: usize,
    spend_keys: &[Scalar],
    message: &[u8],
) -> Result<MlsagSignature> {
    let ring_size = columns.first().map(|c| c.len()).unwrap_or(0);
    if ring_size == 0 || columns.iter().any(|c| c.len() != ring_size) {
        return Err(Error::LengthMismatch(ring_size, 0));
    }
    if spend_keys.len() != columns.len() {
        return Err(Error::LengthMismatch(columns.len(), spend_keys.len()));
    }
    if real_index >= ring_size {
        return Err(Error::IndexOutOfBounds(real_index));
    }

    // Row 0 carries the spend-key public points; the key image is always
    // computed against that row regardless of how many rows there are.
    let key_images: Vec<KeyImage> = columns
        .iter()
        .zip(spend_keys.iter())
        .map(|(column, sk)| {
            let pk = Point::from_curve_point(column[real_index].0);
            KeyImage::compute(sk, &pk)
        })
        .collect::<Result<_>>()?;

    let depth = columns.len();
    let mut responses: Vec<Vec<Scalar>> = (0..depth).map(|_| vec![Scalar::zero(); ring_size]).collect();

    let mut alphas = Vec::with_capacity(depth);
    for _ in 0..depth {
        alphas.push(Scalar::random(&mut rand_core::OsRng));
    }

    let mut challenges = vec![Scalar::zero(); ring_size];
    let start = (real_index + 1) % ring_size;

    let mut commit_points = Vec::with_capacity(depth);
    for alpha in &alphas {
        commit_points.push(CurvePoint::generator().mul(&to_k256(alpha)?));
    }
    challenges[start] = hash_challenge(message, start, &commit_points)?;

    let mut i = start;
    loop {
        if i == real_index {
            break;
        }
        let mut next_points = Vec::with_capacity(depth);
        for (col_idx, column) in columns.iter().enumerate() {
            let response = Scalar::random(&mut rand_core::OsRng);
            responses[col_idx][i] = response.clone();
            let member = &column[i];
            let l = CurvePoint::generator()
                .mul(&to_k256(&response)?)
                .add(member.0.mul(&(-to_k256(&challenges[i])?)));
            next_points.push(l);
        }
        let next = (i + 1) % ring_size;
        challenges[next] = hash_challenge(message, next, &next_points)?;
        i = next;
    }

    for (col_idx, alpha) in alphas.iter().enumerate() {
        let e = &challenges[real_index];
        let response = alpha.add(&e.mul(&spend_keys[col_idx])?)?;
        responses[col_idx][real_index] = response;
    }

    Ok(MlsagSignature {
        key_images,
        challenge: challenges[0].clone(),
        responses,
    })
}

fn hash_challenge(message: &[u8], index: usize, points: &[CurvePoint]) -> Result<Scalar> {
    let parts: Vec<[u8; 33]> = points.iter().map(|p| p.to_bytes(0x02, 0x03)).collect();
    let index_bytes = (index as u32).to_le_bytes();
    let mut refs: Vec<&[u8]> = vec![message, &index_bytes];
    for part in &parts {
        refs.push(part);
    }
    hash_to_scalar(b"sv-mlsag/challenge", &refs)
}

/// `verifyMlsag(columns, signature, message) -> bool`: recomputes the
/// challenge chain around the ring and accepts iff it closes back to the
/// stored starting challenge, the classic ring-signature verification loop
/// (§4.1, §4.4, §8).
pub fn verify_mlsag(columns: &[Vec<RingMember>], signature: &MlsagSignature, message: &[u8]) -> Result<()> {
    let ring_size = columns.first().map(|c| c.len()).unwrap_or(0);
    if ring_size == 0 || columns.iter().any(|c| c.len() != ring_size) {
        return Err(Error::LengthMismatch(ring_size, 0));
    }
    if signature.key_images.len() != columns.len() {
        return Err(Error::LengthMismatch(columns.len(), signature.key_images.len()));
    }
    for r in &signature.responses {
        if r.len() != ring_size {
            return Err(Error::LengthMismatch(ring_size, r.len()));
        }
    }

    let mut e = signature.challenge.clone();
    for i in 0..ring_size {
        let mut points = Vec::with_capacity(columns.len());
        for (col_idx, column) in columns.iter().enumerate() {
            let member = &column[i];
            let response = &signature.responses[col_idx][i];
            let l = CurvePoint::generator()
                .mul(&to_k256(response)?)
                .add(member.0.mul(&(-to_k256(&e)?)));
            points.push(l);
        }
        let next = (i + 1) % ring_size;
        e = hash_challenge(message, next, &points)?;
    }

    if e.as_bytes() == signature.challenge.as_bytes() {
        Ok(())
    } else {
        Err(Error::MlsagInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::pedersen_commit;
    use sv_crypto_keys::derive_pub;

    fn random_key_ring(real_index: usize, ring_size: usize, real_sk: &Scalar) -> Vec<RingMember> {
        let mut ring = Vec::with_capacity(ring_size);
        for i in 0..ring_size {
            let key = if i == real_index {
                derive_pub(real_sk).unwrap()
            } else {
                derive_pub(&Scalar::random(&mut rand_core::OsRng)).unwrap()
            };
            ring.push(RingMember::from_pubkey(&key));
        }
        ring
    }

    #[test]
    fn single_row_signature_verifies() {
        let real_index = 2;
        let ring_size = 5;
        let sk = Scalar::random(&mut rand_core::OsRng);
        let ring = random_key_ring(real_index, ring_size, &sk);
        let columns = vec![ring];

        let sig = generate_mlsag(&columns, real_index, &[sk], b"message").unwrap();
        assert!(verify_mlsag(&columns, &sig, b"message").is_ok());
    }

    #[test]
    fn tampered_message_fails() {
        let real_index = 0;
        let ring_size = 3;
        let sk = Scalar::random(&mut rand_core::OsRng);
        let ring = random_key_ring(real_index, ring_size, &sk);
        let columns = vec![ring];

        let sig = generate_mlsag(&columns, real_index, &[sk], b"message").unwrap();
        assert!(verify_mlsag(&columns, &sig, b"different").is_err());
    }

    #[test]
    fn two_row_single_input_mlsag_balances_and_verifies() {
        let real_index = 1;
        let ring_size = 4;
        let dest_sk = Scalar::random(&mut rand_core::OsRng);
        let key_ring = random_key_ring(real_index, ring_size, &dest_sk);

        let real_value = 7u64;
        let input_blind = Scalar::random(&mut rand_core::OsRng);
        let real_commitment = pedersen_commit(real_value, &input_blind).unwrap();
        let output_blind = Scalar::random(&mut rand_core::OsRng);
        let output_commitment = pedersen_commit(real_value, &output_blind).unwrap();

        let mut in_commitments = Vec::with_capacity(ring_size);
        for i in 0..ring_size {
            if i == real_index {
                in_commitments.push(real_commitment);
            } else {
                let v = Scalar::random(&mut rand_core::OsRng);
                in_commitments.push(pedersen_commit(3, &v).unwrap());
            }
        }

        let (commitment_row, sk) =
            prepare_mlsag(&in_commitments, &[output_commitment], &input_blind, &[output_blind]).unwrap();

        let columns = vec![key_ring, commitment_row];
        let sig = generate_mlsag(&columns, real_index, &[dest_sk, sk], b"tx-preimage").unwrap();
        assert!(verify_mlsag(&columns, &sig, b"tx-preimage").is_ok());
    }
}
