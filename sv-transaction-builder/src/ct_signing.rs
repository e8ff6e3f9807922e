use crate::error::Result;
use sv_account_keys::derive_ct_spend_key;
use sv_crypto_keys::{derive_pub, ecdsa_sign, Point, Scalar};
use sv_transaction_core::{legacy_sighash, SIGHASH_ALL};
use sv_transaction_types::{varint, Transaction};

/// Signs a CT-spending input during a CT→RingCT convert (§4.4 "CT-input
/// ECDSA signing"): recovers the output's spend key the same way the
/// receiver would, signs the legacy sighash over that key, and builds a
/// standard `push(sig||sighashType) || push(pubkey)` `scriptSig`.
pub fn sign_ct_input(
    tx: &Transaction,
    sign_index: usize,
    script_code: &[u8],
    spend_secret: &Scalar,
    scan_secret: &Scalar,
    ephemeral_pub: &Point,
) -> Result<Vec<u8>> {
    let output_spend_key = derive_ct_spend_key(spend_secret, scan_secret, ephemeral_pub)?;
    let output_pubkey = derive_pub(&output_spend_key)?;

    let hash = legacy_sighash(tx, sign_index, script_code, SIGHASH_ALL);
    let mut der_sig = ecdsa_sign(&hash, &output_spend_key)?;
    der_sig.push(SIGHASH_ALL as u8);

    let mut script_sig = Vec::new();
    varint::encode_bytes(&der_sig, &mut script_sig);
    varint::encode_bytes(&output_pubkey.to_bytes(), &mut script_sig);
    Ok(script_sig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use sv_account_keys::{derive_destination, StealthAddress};
    use sv_transaction_types::{Input, OutPoint, Output};

    #[test]
    fn ct_input_signature_is_well_formed() {
        let spend_secret = Scalar::random(&mut OsRng);
        let scan_secret = Scalar::random(&mut OsRng);
        let spend_pub = derive_pub(&spend_secret).unwrap();
        let scan_pub = derive_pub(&scan_secret).unwrap();
        let address = StealthAddress::new(scan_pub, spend_pub);

        let ephemeral_secret = Scalar::random(&mut OsRng);
        let sent = derive_destination(&address, ephemeral_secret).unwrap();

        let mut tx = Transaction::new(1, 0, 0);
        tx.inputs.push(Input {
            prevout: OutPoint::conventional([9u8; 32], 0),
            script_sig: Vec::new(),
            sequence: 0xffff_ffff,
            script_data: None,
        });
        tx.outputs.push(Output::Standard {
            value: 100,
            script_pubkey: vec![0xaa; 25],
        });

        let script_code = vec![0x76, 0xa9, 0x14];
        let script_sig = sign_ct_input(
            &tx,
            0,
            &script_code,
            &spend_secret,
            &scan_secret,
            &sent.ephemeral_public,
        )
        .unwrap();

        assert!(!script_sig.is_empty());
    }
}
