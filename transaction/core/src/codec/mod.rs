// Copyright (c) 2024 Botho Foundation

//! Wire codecs.
//!
//! Versions 2 to 5 share a big-endian layout opened by `77 77 00 <version>`.
//! Anything without that header is read as a legacy msgpack transaction.

mod decoder;
mod encoder;
pub(crate) mod legacy;

use crate::{DecodeError, EncodeError, Transaction};
use decoder::Decoder;
use encoder::Encoder;
use mixin_transaction_types::constants::{
    MAGIC_PREFIX, TX_VERSION_COMMON_ENCODING, TX_VERSION_LATEST,
};

/// The version named by a versioned header, or `None` for legacy bytes.
pub(crate) fn versioned_header(bytes: &[u8]) -> Option<u8> {
    match bytes {
        [m0, m1, 0x00, version, ..] if [*m0, *m1] == MAGIC_PREFIX => Some(*version),
        _ => None,
    }
}

pub(crate) fn encode(tx: &Transaction) -> Result<Vec<u8>, EncodeError> {
    if !(TX_VERSION_COMMON_ENCODING..=TX_VERSION_LATEST).contains(&tx.version) {
        return Err(EncodeError::UnsupportedVersion(tx.version));
    }
    let mut enc = Encoder::new();
    enc.encode_transaction(tx)?;
    Ok(enc.into_bytes())
}

pub(crate) fn decode(bytes: &[u8], version: u8) -> Result<Transaction, DecodeError> {
    if !(TX_VERSION_COMMON_ENCODING..=TX_VERSION_LATEST).contains(&version) {
        return Err(DecodeError::UnsupportedVersion(version));
    }
    Decoder::new(bytes).decode_transaction()
}
