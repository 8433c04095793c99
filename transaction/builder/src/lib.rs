// Copyright (c) 2024 Botho Foundation

//! Utilities for creating Mixin kernel transactions.
//!
//! A [`TransactionBuilder`] checks the spent outputs against the recipients
//! and produces a [`TxBlueprint`]. The blueprint names the ghost keys the
//! API has to supply, and once they are in hand builds the sealed
//! transaction. A [`TxSigner`] then fills in the signatures.

#![deny(unsafe_code)]

mod error;
mod hint;
mod signer;
mod spendable_output;
mod transaction_builder;
mod tx_blueprint;

pub use crate::{
    error::TxBuilderError,
    hint::unique_object_id,
    signer::TxSigner,
    spendable_output::SpendableOutput,
    transaction_builder::TransactionBuilder,
    tx_blueprint::{GhostKeyRequest, TxBlueprint, TxBlueprintOutput},
};
