// Copyright (c) 2024 Botho Foundation

//! Mixin Thin Wallet
//!
//! A client that builds and signs kernel transactions locally and talks to
//! the network through the Safe API and kernel RPC nodes.
//!
//! ## Trust Model
//!
//! - Private keys never leave the client
//! - The API supplies ghost keys and per-input views, never signatures
//! - Transactions are validated and hashed locally before submission
//! - Kernel nodes are tried in turn until one answers

pub mod api;
pub mod config;
pub mod error;
pub mod rpc;

pub mod commands;

pub use api::{Authenticator, SafeApi, StaticToken};
pub use config::ClientConfig;
pub use error::{ApiError, RpcError};
pub use rpc::KernelRpc;
