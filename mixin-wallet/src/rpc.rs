// Copyright (c) 2024 Botho Foundation

//! Kernel RPC client
//!
//! Talks to one of several kernel nodes with:
//! - Automatic failover on transport errors
//! - Promotion of the node that answered to primary
//! - Mapping of kernel error messages to error kinds

use crate::{ClientConfig, RpcError};
use mixin_crypto_keys::{Hash, Key};
use mixin_transaction_core::{Integer, SignedTransaction};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// Kernel RPC request
#[derive(Debug, Serialize)]
struct KernelRequest<'a> {
    method: &'a str,
    params: Value,
}

/// Kernel RPC response
#[derive(Debug, Deserialize)]
struct KernelResponse {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Value,
}

impl KernelResponse {
    /// The error message, if the kernel reported one. Errors arrive either
    /// as a bare string or as an object with a description.
    fn error_message(&self) -> Option<String> {
        match &self.error {
            Value::Null => None,
            Value::String(message) if message.is_empty() => None,
            Value::String(message) => Some(message.clone()),
            Value::Object(map) => Some(
                map.get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| self.error.to_string()),
            ),
            other => Some(other.to_string()),
        }
    }
}

/// Client for the kernel RPC with failover across hosts
#[derive(Debug)]
pub struct KernelRpc {
    client: reqwest::Client,

    hosts: Vec<String>,

    /// Index of the primary (preferred) host
    primary: AtomicUsize,
}

impl KernelRpc {
    /// Create a client over the configured kernel hosts
    pub fn new(config: &ClientConfig) -> Result<Self, RpcError> {
        if config.kernel_rpc_hosts.is_empty() {
            return Err(RpcError::AllHostsFailed);
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            hosts: config.kernel_rpc_hosts.clone(),
            primary: AtomicUsize::new(0),
        })
    }

    async fn call_host<T: DeserializeOwned>(
        &self,
        host: &str,
        method: &str,
        params: &Value,
    ) -> Result<Option<T>, RpcError> {
        let request = KernelRequest {
            method,
            params: params.clone(),
        };
        let response = self.client.post(host).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(RpcError::Status(response.status().as_u16()));
        }

        let body: KernelResponse = response.json().await?;
        if let Some(message) = body.error_message() {
            return Err(RpcError::from_kernel_message(&message));
        }
        if body.data.is_null() {
            return Ok(None);
        }
        serde_json::from_value(body.data)
            .map(Some)
            .map_err(|e| RpcError::Decode(e.to_string()))
    }

    /// Execute an RPC call with automatic failover. `None` means the kernel
    /// answered without data.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<Option<T>, RpcError> {
        let primary = self.primary.load(Ordering::Relaxed) % self.hosts.len();
        for offset in 0..self.hosts.len() {
            let index = (primary + offset) % self.hosts.len();
            let host = &self.hosts[index];
            match self.call_host(host, method, &params).await {
                Ok(result) => {
                    if offset > 0 {
                        debug!("Promoting kernel host {} to primary", host);
                        self.primary.store(index, Ordering::Relaxed);
                    }
                    return Ok(result);
                }
                Err(e) if e.is_transport() => {
                    warn!("Kernel host {} failed {}: {}", host, method, e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(RpcError::AllHostsFailed)
    }

    /// Submit a signed transaction, returning its hash
    pub async fn send_raw_transaction(&self, raw_hex: &str) -> Result<Hash, RpcError> {
        let result: SendResult = self
            .call("sendrawtransaction", json!([raw_hex]))
            .await?
            .ok_or(RpcError::MissingData)?;
        Ok(result.hash)
    }

    /// Submit a signed transaction. When the kernel rejects it for an
    /// unknown output key, the transaction may already be accepted, so it
    /// is looked up by hash before the error is returned.
    pub async fn send_raw_transaction_or_lookup(
        &self,
        tx: &SignedTransaction,
    ) -> Result<Hash, RpcError> {
        let raw = tx.raw_hex()?;
        match self.send_raw_transaction(&raw).await {
            Err(RpcError::InvalidOutputKey(message)) => {
                let hash = tx
                    .hash()
                    .ok_or(RpcError::InvalidOutputKey(message.clone()))?;
                warn!("Kernel rejected {} ({}), looking it up", hash, message);
                match self.get_transaction(&hash).await? {
                    Some(info) if info.hash == hash => {
                        debug!("Transaction {} already known to the kernel", hash);
                        Ok(hash)
                    }
                    _ => Err(RpcError::InvalidOutputKey(message)),
                }
            }
            result => result,
        }
    }

    /// Get a transaction by hash
    pub async fn get_transaction(&self, hash: &Hash) -> Result<Option<TransactionInfo>, RpcError> {
        let info: Option<TransactionInfo> = self
            .call("gettransaction", json!([hash.to_string()]))
            .await?;
        // Unknown transactions come back as an empty object.
        Ok(info.filter(|info| info.hash.has_value()))
    }

    /// Get an unspent output
    pub async fn get_utxo(&self, hash: &Hash, index: u8) -> Result<Option<UtxoInfo>, RpcError> {
        self.call("getutxo", json!([hash.to_string(), index])).await
    }

    /// Get node information
    pub async fn get_info(&self) -> Result<KernelInfo, RpcError> {
        self.call("getinfo", json!([]))
            .await?
            .ok_or(RpcError::MissingData)
    }

    /// Get number of configured hosts
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }
}

// Response types for RPC calls

#[derive(Debug, Deserialize)]
struct SendResult {
    hash: Hash,
}

/// A transaction as the kernel reports it
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TransactionInfo {
    #[serde(default)]
    pub hash: Hash,
    /// Raw transaction hex
    #[serde(default)]
    pub hex: String,
    /// Snapshot that finalized the transaction, if any
    #[serde(default)]
    pub snapshot: Option<String>,
}

impl TransactionInfo {
    pub fn is_finalized(&self) -> bool {
        self.snapshot.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// An unspent output as the kernel reports it
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UtxoInfo {
    pub hash: Hash,
    pub index: u8,
    pub amount: Integer,
    pub keys: Vec<Key>,
    pub mask: Key,
    /// Hash of the transaction holding the lock on this output, if any
    #[serde(default)]
    pub lock: Option<String>,
}

/// Node information returned by getinfo
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct KernelInfo {
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub node: String,
    #[serde(default)]
    pub version: String,
}
