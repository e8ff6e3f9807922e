use crate::error::{Error, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use sv_crypto_keys::Point;
use sv_crypto_ring_signature::Commitment;
use sv_transaction_types::{OutPoint, UtxoRingCt};

/// Ring size used when the caller expresses no preference (§4.4).
pub const DEFAULT_RING_SIZE: usize = 11;

/// A decoy ring candidate fetched from the remote node's opaque decoy
/// service (`getanonoutputs`, §6): a public key, commitment and
/// blockchain index with no further provenance.
#[derive(Debug, Clone, Copy)]
pub struct DecoyCandidate {
    pub pubkey: Point,
    pub commitment: Commitment,
    pub ringct_index: u64,
}

/// One fully assembled ring for one input (§4.4 "Ring assembly per
/// input"). `ring_indices[col]` and the column order of `pubkeys`/
/// `commitments` are kept in lock-step — the witness's ring-index vector
/// must match the MLSAG's column order exactly.
#[derive(Debug, Clone)]
pub struct AssembledRing {
    pub real_index: usize,
    pub pubkeys: Vec<Point>,
    pub commitments: Vec<Commitment>,
    pub ring_indices: Vec<u64>,
    pub prevout: OutPoint,
}

/// Assembles one input's ring (§4.4): draws `ring_size - 1` decoys from
/// `pool`, excluding any pubkey already spent by this transaction
/// (`used_pubkeys`, rule (a)) or any decoy index already consumed by an
/// earlier input of this same transaction (`used_decoy_indices`, rule
/// (b)), places the real UTXO at an independently random column, and
/// leaves the decoys in their draw order from there on — "do not shuffle
/// decoys thereafter; their column order must match the index vector
/// written into the witness".
pub fn assemble_ring(
    real: &UtxoRingCt,
    pool: &[DecoyCandidate],
    ring_size: usize,
    used_pubkeys: &[Point],
    used_decoy_indices: &mut HashSet<u64>,
    rng: &mut impl Rng,
) -> Result<AssembledRing> {
    if !(3..=32).contains(&ring_size) {
        return Err(Error::InvalidRingSize(ring_size));
    }
    let needed = ring_size - 1;

    let mut candidates: Vec<&DecoyCandidate> = pool
        .iter()
        .filter(|d| d.pubkey != real.pubkey)
        .filter(|d| !used_pubkeys.contains(&d.pubkey))
        .filter(|d| !used_decoy_indices.contains(&d.ringct_index))
        .collect();
    if candidates.len() < needed {
        return Err(Error::DecoyShortage {
            needed,
            available: candidates.len(),
        });
    }
    candidates.shuffle(rng);
    let decoys: Vec<&DecoyCandidate> = candidates.into_iter().take(needed).collect();
    for d in &decoys {
        used_decoy_indices.insert(d.ringct_index);
    }

    let real_index = rng.gen_range(0..ring_size);

    let mut pubkeys = Vec::with_capacity(ring_size);
    let mut commitments = Vec::with_capacity(ring_size);
    let mut ring_indices = Vec::with_capacity(ring_size);
    let mut decoy_iter = decoys.into_iter();

    for col in 0..ring_size {
        if col == real_index {
            pubkeys.push(real.pubkey);
            commitments.push(real.commitment);
            ring_indices.push(real.ringct_index);
        } else {
            let d = decoy_iter.next().expect("decoy pool sized for ring");
            pubkeys.push(d.pubkey);
            commitments.push(d.commitment);
            ring_indices.push(d.ringct_index);
        }
    }

    let prevout = OutPoint::anon_marker(1, ring_size as u32);

    Ok(AssembledRing {
        real_index,
        pubkeys,
        commitments,
        ring_indices,
        prevout,
    })
}
