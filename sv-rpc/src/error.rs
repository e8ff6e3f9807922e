use std::time::Duration;

/// Failure kinds for the RPC boundary (§7 "Rpc: transport, protocol,
/// timeout, authentication"). The remote node is an opaque collaborator;
/// this crate never tries to interpret its internal failure modes beyond
/// what JSON-RPC 2.0 itself hands back.
#[derive(Debug, displaydoc::Display)]
pub enum Error {
    /// request to {method} timed out after {after:?}
    Timeout { method: String, after: Duration },
    /// transport failure calling {method}: {source}
    Transport { method: String, source: reqwest::Error },
    /// {method} rejected: HTTP {status}
    Http { method: String, status: reqwest::StatusCode },
    /// authentication failed calling {method}
    Unauthorized { method: String },
    /// malformed JSON-RPC response calling {method}: {detail}
    Protocol { method: String, detail: String },
    /// JSON-RPC error {code} calling {method}: {message}
    RpcError { method: String, code: i32, message: String },
    /// response carried no result for {method}
    EmptyResult { method: String },
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
