// Copyright (c) 2024 Botho Foundation

//! Safe API client
//!
//! The API supplies what a client cannot compute alone: ghost keys for
//! outputs addressed to user ids, and the per-input view keys of a
//! transaction request. Every request is signed by an [`Authenticator`].

use crate::{ApiError, ClientConfig};
use mixin_account_keys::MixAddress;
use mixin_crypto_ghost_keys::GhostKeys;
use mixin_crypto_keys::{Hash, Key};
use mixin_transaction_builder::{GhostKeyRequest, SpendableOutput};
use mixin_transaction_core::{constants::TX_VERSION_LATEST, Integer};
use rand::{CryptoRng, Rng};
use reqwest::{header::CONTENT_TYPE, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};
use uuid::Uuid;

/// Supplies the bearer token of each request.
///
/// Tokens usually sign the method, path and body, so all three are given.
pub trait Authenticator: Send + Sync {
    fn token(&self, method: &str, path: &str, body: &[u8]) -> Result<String, ApiError>;
}

/// A fixed token, for sessions whose token is obtained elsewhere
pub struct StaticToken(pub String);

impl Authenticator for StaticToken {
    fn token(&self, _method: &str, _path: &str, _body: &[u8]) -> Result<String, ApiError> {
        if self.0.is_empty() {
            return Err(ApiError::Auth("empty token".to_string()));
        }
        Ok(self.0.clone())
    }
}

/// API response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    data: Option<T>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    description: String,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, ApiError> {
        if let Some(error) = self.error {
            return Err(ApiError::Api {
                code: error.code,
                description: error.description,
            });
        }
        self.data.ok_or(ApiError::MissingData)
    }
}

/// Client for the Safe API with failover across hosts
pub struct SafeApi<A: Authenticator> {
    client: reqwest::Client,

    hosts: Vec<String>,

    /// Index of the primary (preferred) host
    primary: AtomicUsize,

    auth: A,
}

impl<A: Authenticator> SafeApi<A> {
    /// Create a client over the configured API hosts
    pub fn new(config: &ClientConfig, auth: A) -> Result<Self, ApiError> {
        if config.api_hosts.is_empty() {
            return Err(ApiError::AllHostsFailed);
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            hosts: config
                .api_hosts
                .iter()
                .map(|host| host.trim_end_matches('/').to_string())
                .collect(),
            primary: AtomicUsize::new(0),
            auth,
        })
    }

    async fn request_host<T: DeserializeOwned>(
        &self,
        host: &str,
        method: &Method,
        path: &str,
        body: &[u8],
    ) -> Result<T, ApiError> {
        let token = self.auth.token(method.as_str(), path, body)?;
        let mut request = self
            .client
            .request(method.clone(), format!("{}{}", host, path))
            .bearer_auth(token);
        if !body.is_empty() {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_vec());
        }

        let response = request.send().await?;
        if response.status().is_server_error() {
            return Err(ApiError::Status(response.status().as_u16()));
        }
        let bytes = response.bytes().await?;
        let envelope: ApiResponse<T> =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))?;
        envelope.into_result()
    }

    /// Execute a request with automatic failover
    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let body = match body {
            Some(body) => serde_json::to_vec(body).map_err(|e| ApiError::Decode(e.to_string()))?,
            None => Vec::new(),
        };

        let primary = self.primary.load(Ordering::Relaxed) % self.hosts.len();
        for offset in 0..self.hosts.len() {
            let index = (primary + offset) % self.hosts.len();
            let host = &self.hosts[index];
            match self.request_host(host, &method, path, &body).await {
                Ok(result) => {
                    if offset > 0 {
                        debug!("Promoting API host {} to primary", host);
                        self.primary.store(index, Ordering::Relaxed);
                    }
                    return Ok(result);
                }
                Err(e) if e.is_transport() => {
                    warn!("API host {} failed {} {}: {}", host, method, path, e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(ApiError::AllHostsFailed)
    }

    /// Fetch ghost keys, one entry per request, in request order
    pub async fn create_ghost_keys(
        &self,
        requests: &[GhostKeyRequest],
    ) -> Result<Vec<GhostKeys>, ApiError> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }
        debug!("Requesting ghost keys for {} outputs", requests.len());
        let keys: Vec<GhostKeys> = self
            .request(Method::POST, "/safe/keys", Some(requests))
            .await?;
        if keys.len() != requests.len() {
            return Err(ApiError::Decode(format!(
                "expected {} ghost keys, got {}",
                requests.len(),
                keys.len()
            )));
        }
        Ok(keys)
    }

    /// Create pending transaction requests for unsigned transactions. The
    /// answers carry the per-input views used to sign.
    pub async fn create_transaction_requests(
        &self,
        requests: &[TransactionRequestBody],
    ) -> Result<Vec<TransactionRequest>, ApiError> {
        self.request(Method::POST, "/safe/transaction/requests", Some(requests))
            .await
    }

    /// Submit signed transactions for pending requests
    pub async fn submit_transactions(
        &self,
        requests: &[TransactionRequestBody],
    ) -> Result<Vec<TransactionRequest>, ApiError> {
        self.request(Method::POST, "/safe/transactions", Some(requests))
            .await
    }

    /// Read the current state of a transaction request
    pub async fn read_transaction_request(
        &self,
        request_id: &Uuid,
    ) -> Result<TransactionRequest, ApiError> {
        self.request::<_, ()>(Method::GET, &format!("/safe/transactions/{}", request_id), None)
            .await
    }

    /// List outputs owned by a member set
    pub async fn list_outputs(&self, query: &OutputQuery) -> Result<Vec<SafeOutput>, ApiError> {
        self.request::<_, ()>(Method::GET, &query.path(), None).await
    }
}

/// Body of a transaction request or submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequestBody {
    pub request_id: Uuid,
    /// Transaction hex
    pub raw: String,
}

/// A transaction request as the API reports it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionRequest {
    pub request_id: Uuid,
    pub transaction_hash: Hash,
    /// One view key per input, added to the spend key when signing
    #[serde(default)]
    pub views: Vec<Key>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub raw_transaction: String,
}

/// Filter for [`SafeApi::list_outputs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputQuery {
    pub members: Vec<Uuid>,
    pub threshold: u8,
    /// Kernel asset hash
    pub asset: Option<Hash>,
    /// `unspent`, `signed` or `spent`
    pub state: Option<String>,
    pub offset: Option<u64>,
    pub limit: u32,
}

impl OutputQuery {
    pub fn unspent(members: Vec<Uuid>, threshold: u8) -> Self {
        Self {
            members,
            threshold,
            asset: None,
            state: Some("unspent".to_string()),
            offset: None,
            limit: 500,
        }
    }

    fn path(&self) -> String {
        let mut path = format!(
            "/safe/outputs?members={}&threshold={}&limit={}",
            members_hash(&self.members),
            self.threshold,
            self.limit
        );
        if let Some(asset) = &self.asset {
            path.push_str(&format!("&asset={}", asset));
        }
        if let Some(state) = &self.state {
            path.push_str(&format!("&state={}", state));
        }
        if let Some(offset) = self.offset {
            path.push_str(&format!("&offset={}", offset));
        }
        path
    }
}

/// An output as the API reports it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SafeOutput {
    pub output_id: Uuid,
    pub transaction_hash: Hash,
    pub output_index: u8,
    /// Kernel asset hash
    pub asset: Hash,
    pub amount: Integer,
    pub mask: Key,
    pub keys: Vec<Key>,
    pub receivers: Vec<Uuid>,
    pub receivers_threshold: u8,
    #[serde(default)]
    pub state: String,
}

impl SafeOutput {
    /// The output as builder input. Outputs the API tracks are created at
    /// the latest version.
    pub fn to_spendable(&self) -> Result<SpendableOutput, ApiError> {
        let owner = MixAddress::new_uuid(self.receivers.clone(), self.receivers_threshold)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(SpendableOutput {
            transaction_hash: self.transaction_hash,
            output_index: self.output_index,
            transaction_version: TX_VERSION_LATEST,
            asset: self.asset,
            amount: self.amount,
            mask: self.mask,
            keys: self.keys.clone(),
            owner,
        })
    }
}

/// SHA3-256 of the sorted member ids, the way the API names a member set.
pub fn members_hash(members: &[Uuid]) -> Hash {
    let mut ids: Vec<String> = members.iter().map(Uuid::to_string).collect();
    ids.sort();
    Hash::sha3_256(ids.concat().as_bytes())
}

/// A fresh random request id
pub fn new_request_id<R: Rng + CryptoRng>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}
