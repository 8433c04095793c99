// Copyright (c) 2024 Botho Foundation

use crate::KeyError;
use sha3::{Digest, Sha3_256};
use std::str::FromStr;

/// A 32-byte digest.
///
/// Transaction hashes, asset ids and chain ids all share this type. The
/// producing function (SHA3-256 or BLAKE3) is picked by the caller.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Hash(pub [u8; 32]);

impl_hex_bytes!(Hash, 32);

impl Hash {
    /// SHA3-256 of `data`.
    pub fn sha3_256(data: &[u8]) -> Self {
        Self(Sha3_256::digest(data).into())
    }

    /// BLAKE3-256 of `data`.
    pub fn blake3_256(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Parse exactly 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        Self::decode_hex_exact(s)
    }
}

impl FromStr for Hash {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
