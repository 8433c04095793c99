// Copyright (c) 2024 Botho Foundation

//! The MIX address: a threshold over a list of members, where members are
//! either all user ids or all XIN addresses.
//!
//! Payload layout: `version || threshold || count || members`, with 16 bytes
//! per user id or 64 bytes (`spend || view`) per XIN member, followed by the
//! first four bytes of `SHA3-256("MIX" || payload)`.

use crate::{Address, AddressError, XIN_ADDRESS_PREFIX};
use mixin_crypto_keys::Key;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Prefix of every MIX address string.
pub const MIX_ADDRESS_PREFIX: &str = "MIX";

/// The only MIX payload version in use.
pub const MIX_ADDRESS_VERSION: u8 = 2;

/// Upper bound on both the member count and the threshold.
pub const MAX_MIX_MEMBERS: usize = 64;

const CHECKSUM_LEN: usize = 4;

/// The members of a MIX address. The two kinds never mix.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MixMembers {
    /// Mixin user ids; ghost keys for these come from the API.
    Uuid(Vec<Uuid>),
    /// Raw key pairs; ghost keys for these are derived locally.
    Xin(Vec<Address>),
}

impl MixMembers {
    pub fn len(&self) -> usize {
        match self {
            MixMembers::Uuid(ids) => ids.len(),
            MixMembers::Xin(addrs) => addrs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A threshold address over several members.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MixAddress {
    threshold: u8,
    members: MixMembers,
}

impl MixAddress {
    /// Address over user ids.
    pub fn new_uuid(members: Vec<Uuid>, threshold: u8) -> Result<Self, AddressError> {
        Self::checked(MixMembers::Uuid(members), threshold)
    }

    /// Address over XIN addresses.
    pub fn new_xin(members: Vec<Address>, threshold: u8) -> Result<Self, AddressError> {
        Self::checked(MixMembers::Xin(members), threshold)
    }

    /// Address from member strings, each either a user id or a XIN address.
    pub fn new<S: AsRef<str>>(members: &[S], threshold: u8) -> Result<Self, AddressError> {
        let first = members.first().ok_or(AddressError::NoMembers)?;
        let xin = first.as_ref().starts_with(XIN_ADDRESS_PREFIX);
        if members
            .iter()
            .any(|m| m.as_ref().starts_with(XIN_ADDRESS_PREFIX) != xin)
        {
            return Err(AddressError::MixedMembers);
        }

        if xin {
            let addrs = members
                .iter()
                .map(|m| m.as_ref().parse::<Address>())
                .collect::<Result<Vec<_>, _>>()?;
            Self::new_xin(addrs, threshold)
        } else {
            let ids = members
                .iter()
                .map(|m| Uuid::parse_str(m.as_ref()).map_err(|_| AddressError::InvalidUuid))
                .collect::<Result<Vec<_>, _>>()?;
            Self::new_uuid(ids, threshold)
        }
    }

    fn checked(members: MixMembers, threshold: u8) -> Result<Self, AddressError> {
        let count = members.len();
        if count == 0 {
            return Err(AddressError::NoMembers);
        }
        if count > MAX_MIX_MEMBERS {
            return Err(AddressError::TooManyMembers(count));
        }
        if threshold == 0 || threshold as usize > MAX_MIX_MEMBERS || threshold as usize > count {
            return Err(AddressError::InvalidThreshold(threshold, count));
        }
        Ok(Self { threshold, members })
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn members(&self) -> &MixMembers {
        &self.members
    }

    pub fn members_len(&self) -> usize {
        self.members.len()
    }

    pub fn is_uuid(&self) -> bool {
        matches!(self.members, MixMembers::Uuid(_))
    }

    pub fn uuid_members(&self) -> Option<&[Uuid]> {
        match &self.members {
            MixMembers::Uuid(ids) => Some(ids),
            MixMembers::Xin(_) => None,
        }
    }

    pub fn xin_members(&self) -> Option<&[Address]> {
        match &self.members {
            MixMembers::Xin(addrs) => Some(addrs),
            MixMembers::Uuid(_) => None,
        }
    }

    fn payload(&self) -> Vec<u8> {
        let mut payload = vec![MIX_ADDRESS_VERSION, self.threshold, self.members.len() as u8];
        match &self.members {
            MixMembers::Uuid(ids) => {
                for id in ids {
                    payload.extend_from_slice(id.as_bytes());
                }
            }
            MixMembers::Xin(addrs) => {
                for addr in addrs {
                    payload.extend_from_slice(addr.public_spend().as_bytes());
                    payload.extend_from_slice(addr.public_view().as_bytes());
                }
            }
        }
        payload
    }
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Sha3_256::new();
    hasher.update(MIX_ADDRESS_PREFIX.as_bytes());
    hasher.update(payload);
    let digest = hasher.finalize();
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

impl fmt::Display for MixAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut data = self.payload();
        let sum = checksum(&data);
        data.extend_from_slice(&sum);
        write!(f, "{}{}", MIX_ADDRESS_PREFIX, bs58::encode(data).into_string())
    }
}

impl FromStr for MixAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let encoded = s
            .strip_prefix(MIX_ADDRESS_PREFIX)
            .ok_or(AddressError::InvalidPrefix(MIX_ADDRESS_PREFIX))?;
        let data = bs58::decode(encoded).into_vec()?;
        if data.len() < 3 + CHECKSUM_LEN {
            return Err(AddressError::InvalidLength(data.len()));
        }

        let (payload, sum) = data.split_at(data.len() - CHECKSUM_LEN);
        if checksum(payload)[..] != *sum {
            return Err(AddressError::InvalidChecksum);
        }
        if payload[0] != MIX_ADDRESS_VERSION {
            return Err(AddressError::UnsupportedVersion(payload[0]));
        }

        let threshold = payload[1];
        let count = payload[2] as usize;
        let body = &payload[3..];
        let members = if count > 0 && body.len() == 16 * count {
            MixMembers::Uuid(
                body.chunks_exact(16)
                    .map(|chunk| {
                        let mut id = [0u8; 16];
                        id.copy_from_slice(chunk);
                        Uuid::from_bytes(id)
                    })
                    .collect(),
            )
        } else if count > 0 && body.len() == 64 * count {
            MixMembers::Xin(
                body.chunks_exact(64)
                    .map(|chunk| -> Result<Address, AddressError> {
                        Ok(Address::new(
                            Key::try_from(&chunk[..32])?,
                            Key::try_from(&chunk[32..])?,
                        ))
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            )
        } else if count == 0 {
            return Err(AddressError::NoMembers);
        } else {
            return Err(AddressError::InvalidLength(body.len()));
        };

        Self::checked(members, threshold)
    }
}

impl Serialize for MixAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MixAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
