// Copyright (c) 2024 Botho Foundation

//! Decode command

use anyhow::Result;
use mixin_transaction_core::SignedTransaction;
use serde_json::{json, Value};

/// Summarize a raw transaction as JSON
pub fn summarize(raw_hex: &str) -> Result<Value> {
    let signed = SignedTransaction::from_hex(raw_hex.trim())?;
    let tx = signed.transaction();
    Ok(json!({
        "hash": signed.hash().map(|hash| hash.to_string()),
        "version": tx.version,
        "inputs": tx.inputs.len(),
        "outputs": tx.outputs.len(),
        "signed": !tx.signatures.is_empty(),
        "transaction": tx,
    }))
}

/// Run the decode command
pub fn run(raw_hex: &str) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&summarize(raw_hex)?)?);
    Ok(())
}
