// Copyright (c) 2024 Botho Foundation

//! The application payload carried by a transaction.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Raw extra bytes. JSON writes base64 and reads base64 or hex.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct TransactionExtra(pub Vec<u8>);

impl TransactionExtra {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode text that is either base64 or hex. Base64 wins when both
    /// readings are valid.
    pub fn from_text(s: &str) -> Option<Self> {
        if let Ok(bytes) = STANDARD.decode(s) {
            return Some(Self(bytes));
        }
        hex::decode(s).ok().map(Self)
    }
}

impl From<Vec<u8>> for TransactionExtra {
    fn from(src: Vec<u8>) -> Self {
        Self(src)
    }
}

impl From<&[u8]> for TransactionExtra {
    fn from(src: &[u8]) -> Self {
        Self(src.to_vec())
    }
}

impl From<&str> for TransactionExtra {
    fn from(src: &str) -> Self {
        Self(src.as_bytes().to_vec())
    }
}

impl AsRef<[u8]> for TransactionExtra {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for TransactionExtra {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TransactionExtra({})", hex::encode(&self.0))
    }
}

impl Serialize for TransactionExtra {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for TransactionExtra {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_text(&s).ok_or_else(|| serde::de::Error::custom("extra is neither base64 nor hex"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_writes_base64() {
        let extra = TransactionExtra::from("hello");
        assert_eq!(serde_json::to_string(&extra).unwrap(), "\"aGVsbG8=\"");
    }

    #[test]
    fn test_json_reads_base64_or_hex() {
        let from_b64: TransactionExtra = serde_json::from_str("\"aGVsbG8=\"").unwrap();
        assert_eq!(from_b64.as_bytes(), b"hello");

        // Unpadded, so not valid base64.
        let from_hex: TransactionExtra = serde_json::from_str("\"68656c6c6f\"").unwrap();
        assert_eq!(from_hex.as_bytes(), b"hello");

        assert!(serde_json::from_str::<TransactionExtra>("\"not valid!\"").is_err());
    }

    #[test]
    fn test_base64_wins_over_hex() {
        // Valid as both; read as base64, the form this type writes.
        let extra: TransactionExtra = serde_json::from_str("\"68656c6c\"").unwrap();
        assert_eq!(extra.as_bytes(), STANDARD.decode("68656c6c").unwrap());
        assert_ne!(extra.as_bytes(), b"hell");

        let written = serde_json::to_string(&TransactionExtra::from("hell")).unwrap();
        let back: TransactionExtra = serde_json::from_str(&written).unwrap();
        assert_eq!(back.as_bytes(), b"hell");
    }

    #[test]
    fn test_empty() {
        let extra = TransactionExtra::default();
        assert!(extra.is_empty());
        assert_eq!(serde_json::to_string(&extra).unwrap(), "\"\"");
    }
}
