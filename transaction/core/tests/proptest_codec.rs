// Copyright (c) 2024 Botho Foundation

//! Property-based tests for the transaction codecs.

use mixin_crypto_keys::{Hash, Key, Signature};
use mixin_transaction_core::{
    constants::XIN_ASSET_ID, AggregatedSignature, Integer, Output, Script, Transaction,
    TransactionExtra, TxSignatures,
};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn base_transaction(version: u8) -> Transaction {
    let mut tx = Transaction::new(version, XIN_ASSET_ID);
    tx.add_input(Hash::sha3_256(b"utxo"), 0);
    tx.outputs.push(Output::new_script_output(
        Integer::from_whole(1),
        vec![Key([3; 32])],
        Key([4; 32]),
        Script::new_threshold(1),
    ));
    tx
}

fn arb_output() -> impl Strategy<Value = Output> {
    (
        1u64..u64::MAX,
        prop::collection::vec(prop::array::uniform32(any::<u8>()), 1..4),
        prop::array::uniform32(any::<u8>()),
        1u8..4,
    )
        .prop_map(|(units, keys, mask, threshold)| {
            Output::new_script_output(
                Integer::from_units(units),
                keys.into_iter().map(Key).collect(),
                Key(mask),
                Script::new_threshold(threshold),
            )
        })
}

fn arb_transaction() -> impl Strategy<Value = Transaction> {
    (
        2u8..=5,
        prop::collection::vec((prop::array::uniform32(any::<u8>()), any::<u8>()), 1..4),
        prop::collection::vec(arb_output(), 1..4),
        prop::collection::vec(prop::array::uniform32(any::<u8>()), 0..=2),
        prop::collection::vec(any::<u8>(), 0..256),
    )
        .prop_map(|(version, inputs, outputs, references, extra)| {
            let mut tx = Transaction::new(version, XIN_ASSET_ID);
            for (hash, index) in inputs {
                tx.add_input(Hash(hash), index);
            }
            tx.outputs = outputs;
            if version >= 4 {
                tx.references = references.into_iter().map(Hash).collect();
            }
            tx.extra = TransactionExtra(extra);
            tx
        })
}

proptest! {
    #[test]
    fn decode_inverts_encode(tx in arb_transaction()) {
        let bytes = tx.marshal().unwrap();
        let decoded = Transaction::unmarshal(&bytes).unwrap();
        prop_assert_eq!(&decoded, &tx);
        prop_assert_eq!(decoded.marshal().unwrap(), bytes);

        let hash = tx.payload_hash().unwrap();
        prop_assert_eq!(tx.payload_hash().unwrap(), hash);
        prop_assert_eq!(decoded.payload_hash().unwrap(), hash);
    }

    #[test]
    fn aggregated_signers_survive_encoding(
        signers in prop::collection::btree_set(any::<u16>(), 0..48),
        sig in prop::array::uniform32(any::<u8>()),
    ) {
        let mut tx = base_transaction(5);
        let footer_at = tx.payload_marshal().unwrap().len() - 2;

        let mut raw_sig = [0u8; 64];
        raw_sig[..32].copy_from_slice(&sig);
        tx.signatures = TxSignatures::Aggregated(AggregatedSignature::new(
            Signature(raw_sig),
            signers.iter().copied(),
        ));
        let bytes = tx.marshal().unwrap();

        let expect_sparse = match signers.iter().next_back() {
            Some(max) => (*max as usize) / 8 + 1 > 2 * signers.len(),
            None => false,
        };
        prop_assert_eq!(bytes[footer_at + 68] == 0x01, expect_sparse);

        let decoded = Transaction::unmarshal(&bytes).unwrap();
        match decoded.signatures {
            TxSignatures::Aggregated(agg) => {
                let expected: Vec<u16> = signers.into_iter().collect();
                prop_assert_eq!(agg.signers(), &expected[..]);
            }
            TxSignatures::Map(_) => prop_assert!(false, "expected an aggregated signature"),
        }
    }

    #[test]
    fn map_signers_are_written_ascending(
        order in prop::collection::vec(any::<u16>(), 1..32),
    ) {
        let mut tx = base_transaction(4);
        let footer_at = tx.payload_marshal().unwrap().len() - 2;

        let mut group = BTreeMap::new();
        for signer in &order {
            group.insert(*signer, Signature([*signer as u8; 64]));
        }
        tx.signatures = TxSignatures::Map(vec![group]);
        let bytes = tx.marshal().unwrap();

        let unique: BTreeSet<u16> = order.iter().copied().collect();
        let footer = &bytes[footer_at + 4..];
        let written: Vec<u16> = footer
            .chunks_exact(66)
            .map(|entry| u16::from_be_bytes([entry[0], entry[1]]))
            .collect();
        let expected: Vec<u16> = unique.into_iter().collect();
        prop_assert_eq!(written, expected);
    }

    #[test]
    fn extra_limit_follows_paid_storage(units in 1u64..1_000_000_000_000) {
        let mut tx = base_transaction(4);
        tx.outputs[0].amount = Integer::from_units(units);

        let expected = if units < 100_000 {
            256
        } else {
            ((units / 100_000) as usize * 1024).min(4 * 1024 * 1024)
        };
        prop_assert_eq!(tx.extra_limit(), expected);

        tx.version = 3;
        prop_assert_eq!(tx.extra_limit(), 256);
    }
}
