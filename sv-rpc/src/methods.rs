//! One typed function per remote method, so callers never see raw JSON.
//!
//! The node is an opaque collaborator: this module decodes just enough of
//! each response shape to hand back typed Rust values (`Point`,
//! `Commitment`, hex-decoded byte arrays) and otherwise passes fields
//! through untouched.

use crate::client::RpcClient;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sv_crypto_keys::Point;
use sv_crypto_ring_signature::{Commitment, KeyImage};
use sv_transaction_builder::DecoyCandidate;

fn decode_point(field: &str, hex_str: &str) -> Result<Point> {
    let raw = hex::decode(hex_str).map_err(|_| Error::Protocol {
        method: field.to_string(),
        detail: format!("{field} is not valid hex"),
    })?;
    let arr: [u8; 33] = raw.try_into().map_err(|_| Error::Protocol {
        method: field.to_string(),
        detail: format!("{field} must be 33 bytes"),
    })?;
    Point::from_bytes(&arr).map_err(|e| Error::Protocol {
        method: field.to_string(),
        detail: e.to_string(),
    })
}

fn decode_commitment(field: &str, hex_str: &str) -> Result<Commitment> {
    let raw = hex::decode(hex_str).map_err(|_| Error::Protocol {
        method: field.to_string(),
        detail: format!("{field} is not valid hex"),
    })?;
    let arr: [u8; 33] = raw.try_into().map_err(|_| Error::Protocol {
        method: field.to_string(),
        detail: format!("{field} must be 33 bytes"),
    })?;
    Commitment::from_bytes(&arr).map_err(|e| Error::Protocol {
        method: field.to_string(),
        detail: e.to_string(),
    })
}

#[derive(Deserialize)]
struct RawDecoy {
    pubkey: String,
    commitment: String,
    ringctindex: Option<u64>,
    index: Option<u64>,
    global_index: Option<u64>,
}

/// `getanonoutputs(nInputs, ringSize) -> decoy pool`. The three possible
/// index field names are tried in order — `ringctindex`, then `index`,
/// then `global_index` — since different node builds surface the same
/// value under different keys.
pub async fn get_anon_outputs(client: &RpcClient, n_inputs: u32, ring_size: u32) -> Result<Vec<DecoyCandidate>> {
    let raw: Vec<RawDecoy> = client
        .call("getanonoutputs", json!([n_inputs, ring_size]))
        .await?;
    raw.into_iter()
        .map(|d| {
            let ringct_index = d
                .ringctindex
                .or(d.index)
                .or(d.global_index)
                .ok_or_else(|| Error::Protocol {
                    method: "getanonoutputs".to_string(),
                    detail: "decoy carried no ringctindex/index/global_index field".to_string(),
                })?;
            Ok(DecoyCandidate {
                pubkey: decode_point("pubkey", &d.pubkey)?,
                commitment: decode_commitment("commitment", &d.commitment)?,
                ringct_index,
            })
        })
        .collect()
}

/// `sendrawtransaction(hex) -> txid`.
pub async fn send_raw_transaction(client: &RpcClient, tx_hex: &str) -> Result<String> {
    client.call("sendrawtransaction", json!([tx_hex])).await
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlockchainInfo {
    pub chain: String,
    pub blocks: u64,
    pub bestblockhash: String,
    pub verificationprogress: f64,
    pub chainwork: String,
}

pub async fn get_blockchain_info(client: &RpcClient) -> Result<BlockchainInfo> {
    client.call("getblockchaininfo", json!([])).await
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeyImageStatus {
    pub status: String,
    pub spent: bool,
    #[serde(default)]
    pub spentinmempool: bool,
    pub txid: Option<String>,
    pub msg: Option<String>,
}

/// `checkkeyimages([hex]) -> statuses in input order`.
pub async fn check_key_images(client: &RpcClient, images: &[KeyImage]) -> Result<Vec<KeyImageStatus>> {
    let hexes: Vec<String> = images.iter().map(|i| hex::encode(i.to_bytes())).collect();
    client.call("checkkeyimages", json!([hexes])).await
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWatchOnlyRecord {
    pub raw: String,
    pub amount: Option<u64>,
    pub blind: Option<String>,
    pub ringct_index: Option<u64>,
    pub dbindex: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchOnlyPage {
    #[serde(default)]
    pub anon: Vec<RawWatchOnlyRecord>,
    #[serde(default)]
    pub stealth: Vec<RawWatchOnlyRecord>,
}

/// `getwatchonlytxes(scanHex, offset) -> one page of up to 1000 records`.
pub async fn get_watch_only_txes(client: &RpcClient, scan_hex: &str, offset: u64) -> Result<WatchOnlyPage> {
    client.call("getwatchonlytxes", json!([scan_hex, offset])).await
}

/// `importlightwalletaddress(scanHex, spendPubHex, fromBlockOrTime)`.
pub async fn import_light_wallet_address(
    client: &RpcClient,
    scan_hex: &str,
    spend_pub_hex: &str,
    from_block_or_time: i64,
) -> Result<()> {
    let _: Value = client
        .call(
            "importlightwalletaddress",
            json!([scan_hex, spend_pub_hex, from_block_or_time]),
        )
        .await?;
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchOnlyStatus {
    pub imported: bool,
    #[serde(default)]
    pub scanned_height: Option<u64>,
}

pub async fn get_watch_only_status(client: &RpcClient, scan_hex: &str, spend_pub_hex: &str) -> Result<WatchOnlyStatus> {
    client
        .call("getwatchonlystatus", json!([scan_hex, spend_pub_hex]))
        .await
}

pub async fn get_raw_transaction(client: &RpcClient, txid_hex: &str, verbose: bool) -> Result<Value> {
    client.call("getrawtransaction", json!([txid_hex, verbose])).await
}

pub async fn get_block(client: &RpcClient, block_hash: &str) -> Result<Value> {
    client.call("getblock", json!([block_hash])).await
}

pub async fn get_block_hash(client: &RpcClient, height: u64) -> Result<String> {
    client.call("getblockhash", json!([height])).await
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnspentOutput {
    pub txid: String,
    pub vout: u32,
    pub amount: f64,
    pub confirmations: u64,
}

pub async fn list_unspent(client: &RpcClient) -> Result<Vec<UnspentOutput>> {
    client.call("listunspent", json!([])).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoy_index_field_preference_order() {
        let raw = RawDecoy {
            pubkey: hex::encode([2u8; 33]),
            commitment: hex::encode([8u8; 33]),
            ringctindex: Some(7),
            index: Some(9),
            global_index: Some(11),
        };
        let chosen = raw.ringctindex.or(raw.index).or(raw.global_index);
        assert_eq!(chosen, Some(7));
    }
}
