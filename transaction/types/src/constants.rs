// Copyright (c) 2024 Botho Foundation

//! Mixin kernel transaction constants.

use hex_literal::hex;
use mixin_crypto_keys::Hash;

/// First version using the versioned big-endian encoding.
pub const TX_VERSION_COMMON_ENCODING: u8 = 0x02;

/// First version whose transaction hash is BLAKE3.
pub const TX_VERSION_BLAKE3_HASH: u8 = 0x03;

/// First version carrying references and a 4-byte extra length.
pub const TX_VERSION_REFERENCES: u8 = 0x04;

/// First version hashing ghost keys with BLAKE3 and dropping the chain and
/// asset key from withdrawals.
pub const TX_VERSION_HASH_SIGNATURE: u8 = 0x05;

/// The version new transactions are built with.
pub const TX_VERSION_LATEST: u8 = TX_VERSION_HASH_SIGNATURE;

/// Prefix of a present optional field, and the first two bytes of every
/// versioned encoding.
pub const MAGIC_PREFIX: [u8; 2] = [0x77, 0x77];

/// Prefix of an absent optional field.
pub const NULL_PREFIX: [u8; 2] = [0x00, 0x00];

/// Two markers opening an aggregated signature footer.
pub const AGGREGATED_SIGNATURE_PREFIX: u16 = 0xFFFF;
pub const AGGREGATED_SIGNATURE_MARKER: u16 = 0xFF01;

/// Signer layout modes of an aggregated signature.
pub const AGGREGATED_SIGNATURE_ORDINARY_MASK: u8 = 0x00;
pub const AGGREGATED_SIGNATURE_SPARSE_MASK: u8 = 0x01;

/// Maximum number of inputs, outputs or references.
pub const SLICE_COUNT_LIMIT: usize = 256;

/// Maximum number of references.
pub const REFERENCES_COUNT_LIMIT: usize = 2;

/// Maximum extra size outside the storage carveout.
pub const EXTRA_SIZE_GENERAL_LIMIT: usize = 256;

/// Bytes of extra bought by each storage price step.
pub const EXTRA_SIZE_STORAGE_STEP: usize = 1024;

/// Absolute cap on extra size.
pub const EXTRA_STORAGE_CAPACITY_LIMIT: usize = 4 * 1024 * 1024;

/// Price of one storage step, in units of 10^-8 XIN (0.001 XIN).
pub const EXTRA_STORAGE_PRICE_STEP_UNITS: u64 = 100_000;

/// Highest threshold a script may require.
pub const SCRIPT_THRESHOLD_MAX: u8 = 64;

/// The XIN asset id.
pub const XIN_ASSET_ID: Hash = Hash(hex!(
    "a99c2e0e2b1da4d648755ef19bd95139acbbe6564cfb06dec7cd34931ca72cdc"
));
