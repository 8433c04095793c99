// Copyright (c) 2024 Botho Foundation

//! Errors of the kernel RPC and Safe API clients.

use mixin_transaction_core::TransactionError;
use thiserror::Error;

/// Kernel error prefix for an output key the node does not recognize.
const INVALID_OUTPUT_KEY: &str = "invalid output key ";
/// Kernel error prefix for an input already locked by another transaction.
const INPUT_LOCKED: &str = "input locked for transaction ";
/// Kernel error prefixes for a bad signature.
const INVALID_SIGNATURE: [&str; 2] = ["invalid tx signature number ", "invalid signature keys "];

/// Errors returned by the kernel RPC client.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("invalid output key: {0}")]
    InvalidOutputKey(String),

    #[error("input locked: {0}")]
    InputLocked(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("RPC error: {0}")]
    Kernel(String),

    #[error("missing data in RPC response")]
    MissingData,

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("transaction: {0}")]
    Transaction(#[from] TransactionError),

    #[error("all kernel hosts failed")]
    AllHostsFailed,
}

impl RpcError {
    /// Map a kernel error message to its kind.
    pub fn from_kernel_message(message: &str) -> Self {
        if message.starts_with(INVALID_OUTPUT_KEY) {
            RpcError::InvalidOutputKey(message.to_string())
        } else if message.starts_with(INPUT_LOCKED) {
            RpcError::InputLocked(message.to_string())
        } else if INVALID_SIGNATURE
            .iter()
            .any(|prefix| message.starts_with(prefix))
        {
            RpcError::InvalidSignature(message.to_string())
        } else {
            RpcError::Kernel(message.to_string())
        }
    }

    /// Whether another host could answer differently. Errors reported by a
    /// kernel about the transaction itself are final.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            RpcError::Http(_) | RpcError::Status(_) | RpcError::Decode(_)
        )
    }
}

/// Errors returned by the Safe API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("API error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("missing data in API response")]
    MissingData,

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("all API hosts failed")]
    AllHostsFailed,
}

impl ApiError {
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Http(_) | ApiError::Status(_) | ApiError::Decode(_)
        )
    }
}
