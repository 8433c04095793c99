// Copyright (c) 2024 Botho Foundation

use displaydoc::Display;

/// An error which can occur when parsing or operating on keys, hashes and
/// signatures.
#[derive(Copy, Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum KeyError {
    /// Invalid hex encoding
    InvalidHex,

    /// Length mismatch: expected {0}, got {1}
    LengthMismatch(usize, usize),

    /// The bytes are not a canonical ed25519 scalar
    NonCanonicalScalar,

    /// The bytes do not decompress to an ed25519 point
    InvalidPoint,

    /// Signature verification failed
    InvalidSignature,
}

impl std::error::Error for KeyError {}

impl From<hex::FromHexError> for KeyError {
    fn from(_src: hex::FromHexError) -> Self {
        KeyError::InvalidHex
    }
}
