// Copyright (c) 2024 Botho Foundation

use displaydoc::Display;
use mixin_account_keys::AddressError;
use mixin_crypto_keys::{Hash, KeyError};
use mixin_transaction_core::{
    AmountError, EncodeError, Integer, SignatureError, TransactionError,
};

/// An error that can occur when using the TransactionBuilder or TxSigner
#[derive(Debug, Display)]
pub enum TxBuilderError {
    /// No inputs
    NoInputs,

    /// No recipients
    NoRecipients,

    /// Too many inputs: {0}
    TooManyInputs(usize),

    /// Too many outputs: {0}
    TooManyOutputs(usize),

    /// Too many references: {0}
    TooManyReferences(usize),

    /// Memo too long: {0} bytes
    MemoTooLong(usize),

    /// Unsupported transaction version: {0}
    UnsupportedVersion(u8),

    /// Mixed assets not allowed: Expected {0}, Found {1}
    MixedAssets(Hash, Hash),

    /// Recipient {0} has a zero amount
    ZeroAmount(usize),

    /// Insufficient funds: have {0}, need {1}
    InsufficientFunds(Integer, Integer),

    /// Expected ghost keys for {0} outputs, got {1}
    GhostKeyCountMismatch(usize, usize),

    /// Ghost keys for output {0} do not match its receivers
    GhostKeyMismatch(usize),

    /// Expected {0} view keys, got {1}
    ViewCountMismatch(usize, usize),

    /// Input {0} does not spend the given output
    InputMismatch(usize),

    /// Key: {0}
    Key(KeyError),

    /// Address: {0}
    Address(AddressError),

    /// Bad Amount: {0}
    BadAmount(AmountError),

    /// Encode: {0}
    Encode(EncodeError),

    /// Transaction: {0}
    Transaction(TransactionError),

    /// Signature: {0}
    Signature(SignatureError),
}

impl std::error::Error for TxBuilderError {}

impl From<KeyError> for TxBuilderError {
    fn from(x: KeyError) -> Self {
        TxBuilderError::Key(x)
    }
}

impl From<AddressError> for TxBuilderError {
    fn from(x: AddressError) -> Self {
        TxBuilderError::Address(x)
    }
}

impl From<AmountError> for TxBuilderError {
    fn from(x: AmountError) -> Self {
        TxBuilderError::BadAmount(x)
    }
}

impl From<EncodeError> for TxBuilderError {
    fn from(x: EncodeError) -> Self {
        TxBuilderError::Encode(x)
    }
}

impl From<TransactionError> for TxBuilderError {
    fn from(x: TransactionError) -> Self {
        TxBuilderError::Transaction(x)
    }
}

impl From<SignatureError> for TxBuilderError {
    fn from(x: SignatureError) -> Self {
        TxBuilderError::Signature(x)
    }
}
