// Copyright (c) 2024 Botho Foundation

//! The XIN address: a public spend key and a public view key with a
//! four-byte SHA3 checksum, base58 encoded behind the `XIN` prefix.

use crate::AddressError;
use mixin_crypto_keys::{deterministic_view_key, Key};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};
use std::{fmt, str::FromStr};

/// Prefix of every mainnet address string.
pub const XIN_ADDRESS_PREFIX: &str = "XIN";

const CHECKSUM_LEN: usize = 4;

/// A Mixin mainnet public address.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Address {
    /// The public spend key `B`.
    public_spend: Key,

    /// The public view key `A`.
    public_view: Key,
}

impl Address {
    pub fn new(public_spend: Key, public_view: Key) -> Self {
        Self {
            public_spend,
            public_view,
        }
    }

    /// A "public" address whose view key anyone can derive from the spend
    /// key.
    pub fn from_public_spend(public_spend: Key) -> Result<Self, AddressError> {
        let public_view = deterministic_view_key(&public_spend).public_key()?;
        Ok(Self::new(public_spend, public_view))
    }

    pub fn public_spend(&self) -> &Key {
        &self.public_spend
    }

    pub fn public_view(&self) -> &Key {
        &self.public_view
    }

    /// `(public_view, public_spend)`, the order the ghost-key engine takes.
    pub fn ghost_receiver(&self) -> (Key, Key) {
        (self.public_view, self.public_spend)
    }

    fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        let mut hasher = Sha3_256::new();
        hasher.update(XIN_ADDRESS_PREFIX.as_bytes());
        hasher.update(self.public_spend.as_bytes());
        hasher.update(self.public_view.as_bytes());
        let digest = hasher.finalize();
        let mut out = [0u8; CHECKSUM_LEN];
        out.copy_from_slice(&digest[..CHECKSUM_LEN]);
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut bytes = Vec::with_capacity(64 + CHECKSUM_LEN);
        bytes.extend_from_slice(self.public_spend.as_bytes());
        bytes.extend_from_slice(self.public_view.as_bytes());
        bytes.extend_from_slice(&self.checksum());
        write!(f, "{}{}", XIN_ADDRESS_PREFIX, bs58::encode(bytes).into_string())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let encoded = s
            .strip_prefix(XIN_ADDRESS_PREFIX)
            .ok_or(AddressError::InvalidPrefix(XIN_ADDRESS_PREFIX))?;
        let bytes = bs58::decode(encoded).into_vec()?;
        if bytes.len() != 64 + CHECKSUM_LEN {
            return Err(AddressError::InvalidLength(bytes.len()));
        }

        let address = Self::new(
            Key::try_from(&bytes[..32])?,
            Key::try_from(&bytes[32..64])?,
        );
        if address.checksum()[..] != bytes[64..] {
            return Err(AddressError::InvalidChecksum);
        }
        Ok(address)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
