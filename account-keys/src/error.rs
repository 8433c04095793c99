// Copyright (c) 2024 Botho Foundation

//! Errors which can occur in connection to addresses and account keys

use displaydoc::Display;
use mixin_crypto_keys::KeyError;

/// An error which can occur when parsing or building an address
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum AddressError {
    /// Address does not start with {0}
    InvalidPrefix(&'static str),

    /// Invalid base58 encoding
    InvalidBase58,

    /// Address payload has an invalid length: {0}
    InvalidLength(usize),

    /// Address checksum mismatch
    InvalidChecksum,

    /// Unsupported MIX address version: {0}
    UnsupportedVersion(u8),

    /// Invalid threshold {0} for {1} members
    InvalidThreshold(u8, usize),

    /// Too many members: {0}
    TooManyMembers(usize),

    /// A MIX address needs at least one member
    NoMembers,

    /// User ids and XIN addresses cannot share a MIX address
    MixedMembers,

    /// Invalid user id
    InvalidUuid,

    /// Key: {0}
    Key(KeyError),
}

impl std::error::Error for AddressError {}

impl From<KeyError> for AddressError {
    fn from(src: KeyError) -> Self {
        Self::Key(src)
    }
}

impl From<bs58::decode::Error> for AddressError {
    fn from(_src: bs58::decode::Error) -> Self {
        Self::InvalidBase58
    }
}
