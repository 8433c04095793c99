// Copyright (c) 2024 Botho Foundation

//! Raw transaction submission command

use anyhow::Result;
use mixin_transaction_core::{SignedTransaction, TxState};
use tracing::info;

use super::print_success;
use crate::{ClientConfig, KernelRpc};

/// Run the send-raw command
pub async fn run(config: &ClientConfig, raw_hex: &str) -> Result<()> {
    let mut signed = SignedTransaction::from_hex(raw_hex.trim())?;
    let rpc = KernelRpc::new(config)?;

    let hash = rpc.send_raw_transaction_or_lookup(&signed).await?;
    signed.advance(TxState::Submitted)?;
    info!("Transaction {} submitted", hash);

    match rpc.get_transaction(&hash).await? {
        Some(info) if info.is_finalized() => {
            signed.advance(TxState::Mined)?;
            print_success(&format!("{} finalized", hash));
        }
        _ => print_success(&format!("{} submitted", hash)),
    }
    Ok(())
}
