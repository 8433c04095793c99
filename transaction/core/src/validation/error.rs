// Copyright (c) 2024 Botho Foundation

use displaydoc::Display;
use mixin_crypto_keys::Hash;
use mixin_transaction_types::{AmountError, Integer, ScriptError};

/// Type alias for transaction validation results.
pub type TransactionValidationResult<T> = Result<T, TransactionValidationError>;

/// Reasons why a transaction may fail to be valid.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum TransactionValidationError {
    /// Unsupported transaction version {0}
    UnsupportedVersion(u8),

    /// A transaction must have at least one input.
    NoInputs,

    /// Too many inputs: {0}
    TooManyInputs(usize),

    /// A transaction must have at least one output.
    NoOutputs,

    /// Too many outputs: {0}
    TooManyOutputs(usize),

    /// Too many references: {0}
    TooManyReferences(usize),

    /// Version {0} transactions cannot carry references
    ReferencesNotSupported(u8),

    /// Extra of {0} bytes exceeds the limit of {1}
    ExtraTooLarge(usize, usize),

    /// Input {0} must be exactly one of a UTXO, genesis, deposit or mint
    InvalidInputShape(usize),

    /// Output {0}:{1} is spent twice
    DuplicateInput(Hash, u8),

    /// Output {0} has a non-positive amount
    NonPositiveAmount(usize),

    /// Output {0} script: {1}
    InvalidScript(usize, ScriptError),

    /// Output {0} has a key or mask that is not a curve point
    InvalidOutputKey(usize),

    /// Output {0} withdrawal data does not match its type
    InvalidWithdrawal(usize),

    /// Expected {0} spent outputs, found {1}
    SpentOutputsMismatch(usize, usize),

    /// Input {0} spends a different asset
    AssetMismatch(usize),

    /// Inputs total {0} but outputs total {1}
    UnbalancedAmounts(Integer, Integer),

    /// Amount: {0}
    Amount(AmountError),
}

impl std::error::Error for TransactionValidationError {}

impl From<AmountError> for TransactionValidationError {
    fn from(src: AmountError) -> Self {
        Self::Amount(src)
    }
}
