// Copyright (c) 2024 Botho Foundation

//! Mixin kernel transactions: the data model, the legacy msgpack and
//! versioned binary codecs, hashing, validation and the lifecycle of a
//! transaction on its way to the network.

#![deny(unsafe_code)]

mod aggregated;
mod codec;
mod error;
mod extra;
mod state;
mod tx;

pub mod validation;

pub use crate::{
    aggregated::AggregatedSignature,
    error::{DecodeError, EncodeError, SignatureError, StateError, TransactionError},
    extra::TransactionExtra,
    state::{SignedTransaction, TxState},
    tx::{
        DepositData, Input, MintData, Output, Transaction, TxSignatures, WithdrawalData,
    },
};

pub use mixin_transaction_types::{
    constants, AmountError, Integer, OutputType, Script, ScriptError,
};
