// Copyright (c) 2024 Botho Foundation

//! A single signature standing in for every input's signers.

use mixin_crypto_keys::Signature;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One signature over the transaction hash plus the positions, in the
/// flattened list of all spent keys, of the keys that took part.
///
/// Signer positions are kept sorted and unique.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct AggregatedSignature {
    pub signature: Signature,
    #[serde(deserialize_with = "deserialize_signers")]
    signers: Vec<u16>,
}

impl AggregatedSignature {
    pub fn new<I: IntoIterator<Item = u16>>(signature: Signature, signers: I) -> Self {
        let signers: BTreeSet<u16> = signers.into_iter().collect();
        Self {
            signature,
            signers: signers.into_iter().collect(),
        }
    }

    /// Signer positions in ascending order.
    pub fn signers(&self) -> &[u16] {
        &self.signers
    }

    /// Whether the footer lists signer positions explicitly instead of
    /// writing a bitmap. A bitmap takes `max/8 + 1` bytes and a list takes
    /// two bytes per signer; the list is used only when strictly smaller.
    pub fn uses_sparse_layout(&self) -> bool {
        match self.signers.last() {
            None => false,
            Some(max) => (*max as usize) / 8 + 1 > self.signers.len() * 2,
        }
    }

    /// The signer bitmap: bit `m % 8` of byte `m / 8` is set for signer `m`.
    pub fn bitmap(&self) -> Vec<u8> {
        let Some(max) = self.signers.last() else {
            return Vec::new();
        };
        let mut masks = vec![0u8; *max as usize / 8 + 1];
        for m in &self.signers {
            masks[*m as usize / 8] |= 1 << (m % 8);
        }
        masks
    }

    /// Signers set in `bitmap`, ascending.
    pub fn signers_from_bitmap(bitmap: &[u8]) -> Vec<u16> {
        let mut signers = Vec::new();
        for (i, byte) in bitmap.iter().enumerate() {
            for bit in 0..8u16 {
                if byte & (1 << bit) != 0 {
                    signers.push(i as u16 * 8 + bit);
                }
            }
        }
        signers
    }
}

fn deserialize_signers<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<u16>, D::Error> {
    let raw = Vec::<u16>::deserialize(deserializer)?;
    let set: BTreeSet<u16> = raw.into_iter().collect();
    Ok(set.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signers_sorted_and_deduplicated() {
        let agg = AggregatedSignature::new(Signature::default(), [9, 1, 4, 1]);
        assert_eq!(agg.signers(), &[1, 4, 9]);
    }

    #[test]
    fn test_layout_choice() {
        // Empty sets always use the bitmap form with no bytes.
        let empty = AggregatedSignature::new(Signature::default(), []);
        assert!(!empty.uses_sparse_layout());
        assert!(empty.bitmap().is_empty());

        // 0..8 fits in one bitmap byte.
        let dense = AggregatedSignature::new(Signature::default(), 0..8);
        assert!(!dense.uses_sparse_layout());
        assert_eq!(dense.bitmap(), vec![0xff]);

        // max 15: 2 bitmap bytes vs 2 list bytes, bitmap still wins.
        let edge = AggregatedSignature::new(Signature::default(), [15]);
        assert!(!edge.uses_sparse_layout());
        assert_eq!(edge.bitmap(), vec![0x00, 0x80]);

        // max 16: 3 bitmap bytes vs 2 list bytes.
        let sparse = AggregatedSignature::new(Signature::default(), [16]);
        assert!(sparse.uses_sparse_layout());

        let wide = AggregatedSignature::new(Signature::default(), [0, 65535]);
        assert!(wide.uses_sparse_layout());
    }

    #[test]
    fn test_bitmap_inverse() {
        let agg = AggregatedSignature::new(Signature::default(), [0, 3, 8, 17, 23]);
        assert_eq!(
            AggregatedSignature::signers_from_bitmap(&agg.bitmap()),
            agg.signers()
        );
    }

    #[test]
    fn test_json_shape() {
        let agg = AggregatedSignature::new(Signature::default(), [2, 1]);
        let json = serde_json::to_value(&agg).unwrap();
        assert_eq!(json["signers"], serde_json::json!([1, 2]));
        let back: AggregatedSignature = serde_json::from_value(json).unwrap();
        assert_eq!(back, agg);
    }
}
