//! Typed JSON-RPC method surface over the remote node's opaque services
//! (§6). The node is consulted only for: decoy fetch, key-image spent
//! status, the watch-only transaction stream, and raw broadcast — every
//! other collaborator (the crypto facade, stealth layer, assembler,
//! scanner) is local and has no notion of this crate.
//!
//! [`RpcClient`] is the single-node transport (§9 "static mutable RPC
//! configuration" replaced by an explicit [`RpcConfig`]); [`methods`]
//! wraps it with one typed function per RPC method so callers never touch
//! raw `serde_json::Value`.

mod client;
mod config;
mod error;
pub mod methods;

pub use client::RpcClient;
pub use config::{RpcConfig, DEFAULT_TIMEOUT, ENV_NODE_PASSWORD, ENV_NODE_URL, ENV_NODE_USER};
pub use error::{Error, Result};
pub use methods::{
    BlockchainInfo, KeyImageStatus, RawWatchOnlyRecord, UnspentOutput, WatchOnlyPage, WatchOnlyStatus,
};
