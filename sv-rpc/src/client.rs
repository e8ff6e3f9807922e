use crate::config::RpcConfig;
use crate::error::{Error, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    method: String,
    params: Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: Option<String>,
    result: Option<Value>,
    error: Option<JsonRpcErrorBody>,
    #[allow(dead_code)]
    id: Option<u64>,
}

#[derive(Deserialize)]
struct JsonRpcErrorBody {
    code: i32,
    message: String,
}

/// A single-node JSON-RPC 2.0 client (§6). Unlike the teacher's
/// multi-node failover pool, the spec's remote node is one trusted
/// collaborator behind a single [`RpcConfig`]; there is no discovery, no
/// peer verification, and no retry inside the core (§4.4 "Failure
/// semantics": RPC failures are surfaced to the caller).
pub struct RpcClient {
    config: RpcConfig,
    http: reqwest::Client,
}

impl RpcClient {
    pub fn new(config: RpcConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| Error::Transport {
                method: "<client-init>".to_string(),
                source,
            })?;
        Ok(Self { config, http })
    }

    /// Issues one JSON-RPC 2.0 call and decodes its `result` into `T`.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = REQUEST_ID.fetch_add(1, Ordering::SeqCst);
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: method.to_string(),
            params,
            id,
        };

        debug!(method, "sending RPC request");

        let mut builder = self.http.post(&self.config.url).json(&request);
        if let Some(user) = &self.config.user {
            builder = builder.basic_auth(user, self.config.password.as_deref());
        }

        let response = builder.send().await.map_err(|source| {
            if source.is_timeout() {
                Error::Timeout {
                    method: method.to_string(),
                    after: self.config.timeout,
                }
            } else {
                Error::Transport {
                    method: method.to_string(),
                    source,
                }
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Unauthorized { method: method.to_string() });
        }
        if !status.is_success() {
            return Err(Error::Http {
                method: method.to_string(),
                status,
            });
        }

        let body: JsonRpcResponse = response.json().await.map_err(|source| Error::Protocol {
            method: method.to_string(),
            detail: source.to_string(),
        })?;

        if let Some(error) = body.error {
            return Err(Error::RpcError {
                method: method.to_string(),
                code: error.code,
                message: error.message,
            });
        }

        let result = body.result.ok_or_else(|| Error::EmptyResult { method: method.to_string() })?;
        serde_json::from_value(result).map_err(|source| Error::Protocol {
            method: method.to_string(),
            detail: source.to_string(),
        })
    }
}
