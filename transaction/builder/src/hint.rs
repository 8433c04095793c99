// Copyright (c) 2024 Botho Foundation

use sha3::{Digest, Sha3_256};
use uuid::Uuid;

/// A deterministic name-based id for output `index` under `hint`.
///
/// The first 16 bytes of `SHA3-256(hint || "OUTPUT" || index)`, stamped
/// with version 3 and the RFC 4122 variant. Repeating a request with the
/// same hint yields the same ghost keys from the API.
pub fn unique_object_id(hint: &str, index: u8) -> Uuid {
    let mut hasher = Sha3_256::new();
    hasher.update(hint.as_bytes());
    hasher.update(b"OUTPUT");
    hasher.update([index]);
    let digest = hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    bytes[6] = (bytes[6] & 0x0f) | 0x30;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    Uuid::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::{Variant, Version};

    #[test]
    fn test_unique_object_id_is_name_based() {
        let id = unique_object_id("payment-42", 0);
        assert_eq!(id.get_version(), Some(Version::Md5));
        assert_eq!(id.get_variant(), Variant::RFC4122);
    }

    #[test]
    fn test_unique_object_id_is_deterministic() {
        assert_eq!(unique_object_id("payment-42", 3), unique_object_id("payment-42", 3));
        assert_ne!(unique_object_id("payment-42", 3), unique_object_id("payment-42", 4));
        assert_ne!(unique_object_id("payment-42", 3), unique_object_id("payment-43", 3));
    }
}
