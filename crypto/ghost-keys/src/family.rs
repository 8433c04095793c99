// Copyright (c) 2024 Botho Foundation

use curve25519_dalek::{edwards::EdwardsPoint, scalar::Scalar};
use mixin_crypto_keys::{reduce_uniform, Hash};
use serde::{Deserialize, Serialize};

/// First transaction version whose ghost keys hash with BLAKE3.
const BLAKE3_GHOST_VERSION: u8 = 5;

/// The hash function behind the ghost-key scalar.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum HashFamily {
    Sha3,
    Blake3,
}

impl HashFamily {
    pub fn for_version(version: u8) -> Self {
        if version < BLAKE3_GHOST_VERSION {
            HashFamily::Sha3
        } else {
            HashFamily::Blake3
        }
    }

    pub fn hash(&self, data: &[u8]) -> Hash {
        match self {
            HashFamily::Sha3 => Hash::sha3_256(data),
            HashFamily::Blake3 => Hash::blake3_256(data),
        }
    }

    /// `H(data) || H(H(data))` reduced to a scalar.
    fn double_hash_scalar(&self, data: &[u8]) -> Scalar {
        let h0 = self.hash(data);
        let h1 = self.hash(h0.as_bytes());
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(h0.as_bytes());
        wide[32..].copy_from_slice(h1.as_bytes());
        reduce_uniform(&wide)
    }
}

/// LEB128 unsigned varint.
fn put_uvarint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// The tweak scalar shared by sender and receiver for output `index`.
pub fn hash_scalar(point: &EdwardsPoint, index: u8, family: HashFamily) -> Scalar {
    let mut buf = point.compress().to_bytes().to_vec();
    put_uvarint(&mut buf, index as u64);
    let x0 = family.double_hash_scalar(&buf);
    family.double_hash_scalar(x0.as_bytes())
}
