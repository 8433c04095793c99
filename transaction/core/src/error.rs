// Copyright (c) 2024 Botho Foundation

//! Errors that can occur when encoding, decoding and signing transactions

use crate::{validation::TransactionValidationError, TxState};
use displaydoc::Display;
use mixin_crypto_keys::KeyError;
use mixin_transaction_types::AmountError;

/// An error that occurs when reading an encoded transaction
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum DecodeError {
    /// Unexpected end of input: needed {0} more bytes
    UnexpectedEof(usize),

    /// {0} trailing bytes after the transaction
    TrailingBytes(usize),

    /// Unsupported transaction version {0}
    UnsupportedVersion(u8),

    /// Malformed prefix {0:#06x}
    InvalidPrefix(u16),

    /// Input index {0} does not fit in a byte
    InvalidInputIndex(u64),

    /// Unknown output type {0:#04x}
    UnknownOutputType(u8),

    /// Amount: {0}
    Amount(AmountError),

    /// String field is not valid UTF-8
    InvalidString,

    /// Input is not valid hex
    InvalidHex,

    /// Invalid aggregated signature marker {0:#06x}
    InvalidSignatureMarker(u16),

    /// Invalid aggregated signer layout {0:#04x}
    InvalidSignerMode(u8),

    /// Signer indices are not strictly ascending
    UnorderedSigners,

    /// Signer bitmap has trailing zero bytes
    NonMinimalBitmap,

    /// Extra of {0} bytes exceeds the storage capacity
    ExtraTooLarge(usize),

    /// Field has {0} bytes, expected {1}
    InvalidLength(usize, usize),

    /// Msgpack: {0}
    Msgpack(String),
}

impl std::error::Error for DecodeError {}

impl From<AmountError> for DecodeError {
    fn from(src: AmountError) -> Self {
        Self::Amount(src)
    }
}

impl From<rmp_serde::decode::Error> for DecodeError {
    fn from(src: rmp_serde::decode::Error) -> Self {
        Self::Msgpack(src.to_string())
    }
}

/// An error that occurs when writing a transaction
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum EncodeError {
    /// Field '{0}' is too long to encode: {1}
    TooLong(&'static str, usize),

    /// Unsupported transaction version {0}
    UnsupportedVersion(u8),

    /// Legacy transactions cannot carry an aggregated signature
    LegacyAggregatedSignature,

    /// Legacy signatures must use signer indices 0..n
    LegacySignerIndices,

    /// Msgpack: {0}
    Msgpack(String),
}

impl std::error::Error for EncodeError {}

impl From<rmp_serde::encode::Error> for EncodeError {
    fn from(src: rmp_serde::encode::Error) -> Self {
        Self::Msgpack(src.to_string())
    }
}

/// An error that occurs when checking or attaching signatures
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum SignatureError {
    /// Expected {0} signature groups, found {1}
    InputCountMismatch(usize, usize),

    /// Signer {signer} is out of range for input {input}
    SignerOutOfRange {
        /// Input position
        input: usize,
        /// Signer index within the spent output's keys
        signer: u16,
    },

    /// Invalid signature by signer {signer} on input {input}
    InvalidSignature {
        /// Input position
        input: usize,
        /// Signer index within the spent output's keys
        signer: u16,
    },

    /// Invalid aggregated signature
    InvalidAggregatedSignature,

    /// Input {0} has no signatures
    MissingSignatures(usize),

    /// There is no input {0}
    InputOutOfRange(usize),

    /// No key of input {0} matches the signing key
    PublicKeyMismatch(usize),

    /// The transaction hash has not been computed yet
    NotSealed,

    /// Encode: {0}
    Encode(EncodeError),

    /// Key: {0}
    Key(KeyError),
}

impl std::error::Error for SignatureError {}

impl From<EncodeError> for SignatureError {
    fn from(src: EncodeError) -> Self {
        Self::Encode(src)
    }
}

impl From<KeyError> for SignatureError {
    fn from(src: KeyError) -> Self {
        Self::Key(src)
    }
}

/// An error that occurs when moving a transaction through its lifecycle
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum StateError {
    /// The transaction hash is cached and the body can no longer change
    Sealed,

    /// Cannot move from {0:?} to {1:?}
    InvalidTransition(TxState, TxState),
}

impl std::error::Error for StateError {}

/// Any error raised while taking a transaction from draft to submission
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum TransactionError {
    /// Decode: {0}
    Decode(DecodeError),

    /// Encode: {0}
    Encode(EncodeError),

    /// Validation: {0}
    Validation(TransactionValidationError),

    /// Signature: {0}
    Signature(SignatureError),

    /// State: {0}
    State(StateError),
}

impl std::error::Error for TransactionError {}

impl From<DecodeError> for TransactionError {
    fn from(src: DecodeError) -> Self {
        Self::Decode(src)
    }
}

impl From<EncodeError> for TransactionError {
    fn from(src: EncodeError) -> Self {
        Self::Encode(src)
    }
}

impl From<TransactionValidationError> for TransactionError {
    fn from(src: TransactionValidationError) -> Self {
        Self::Validation(src)
    }
}

impl From<SignatureError> for TransactionError {
    fn from(src: SignatureError) -> Self {
        Self::Signature(src)
    }
}

impl From<StateError> for TransactionError {
    fn from(src: StateError) -> Self {
        Self::State(src)
    }
}
