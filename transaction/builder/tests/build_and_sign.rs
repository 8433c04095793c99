// Copyright (c) 2024 Botho Foundation

//! Build, sign and verify transactions end to end.

use assert_matches::assert_matches;
use mixin_account_keys::{AccountKey, MixAddress};
use mixin_crypto_ghost_keys::{derive_ghost_private, GhostKeys};
use mixin_crypto_keys::{Hash, Key};
use mixin_transaction_builder::{
    SpendableOutput, TransactionBuilder, TxBuilderError, TxSigner,
};
use mixin_transaction_core::{
    constants::XIN_ASSET_ID, validation::validate_spending, Integer, SignatureError,
    SignedTransaction,
};
use rand::{rngs::StdRng, SeedableRng};

fn received(
    rng: &mut StdRng,
    owners: &[&AccountKey],
    threshold: u8,
    label: &[u8],
    whole: u64,
) -> SpendableOutput {
    let receivers: Vec<_> = owners
        .iter()
        .map(|owner| owner.address().ghost_receiver())
        .collect();
    let ghost = GhostKeys::create(rng, &receivers, 1, 5).unwrap();
    SpendableOutput {
        transaction_hash: Hash::sha3_256(label),
        output_index: 1,
        transaction_version: 5,
        asset: XIN_ASSET_ID,
        amount: Integer::from_whole(whole),
        mask: ghost.mask,
        keys: ghost.keys,
        owner: MixAddress::new_xin(owners.iter().map(|o| *o.address()).collect(), threshold)
            .unwrap(),
    }
}

fn keys_of(inputs: &[SpendableOutput]) -> Vec<Vec<Key>> {
    inputs.iter().map(|input| input.keys.clone()).collect()
}

#[test]
fn sign_with_account_spends_local_outputs() {
    let mut rng = StdRng::seed_from_u64(21);
    let alice = AccountKey::random(&mut rng);
    let bob = AccountKey::random(&mut rng);

    let inputs = vec![
        received(&mut rng, &[&alice], 1, b"first", 2),
        received(&mut rng, &[&alice], 1, b"second", 3),
    ];
    let mut builder = TransactionBuilder::new();
    for input in &inputs {
        builder.add_input(input.clone());
    }
    builder.add_output(
        MixAddress::new_xin(vec![*bob.address()], 1).unwrap(),
        Integer::from_units(420_000_000),
    );
    let mut signed = builder.build(&[], &mut rng).unwrap();

    TxSigner::sign_with_account(&alice, &mut signed, &inputs).unwrap();

    let spent: Vec<_> = inputs.iter().map(SpendableOutput::spent_output).collect();
    assert_eq!(validate_spending(signed.transaction(), &spent), Ok(()));
    assert_eq!(signed.verify_signatures(&keys_of(&inputs)), Ok(()));

    let change = &signed.transaction().outputs[1];
    assert_eq!(change.amount, Integer::from_units(80_000_000));

    let relayed = SignedTransaction::from_hex(&signed.raw_hex().unwrap()).unwrap();
    assert_eq!(relayed.verify_signatures(&keys_of(&inputs)), Ok(()));
}

#[test]
fn sign_with_views_matches_slot() {
    let mut rng = StdRng::seed_from_u64(22);
    let alice = AccountKey::random(&mut rng);
    let bob = AccountKey::random(&mut rng);

    let inputs = vec![received(&mut rng, &[&bob, &alice], 1, b"shared", 5)];
    let mut builder = TransactionBuilder::new();
    builder.add_input(inputs[0].clone());
    builder.add_output(
        MixAddress::new_xin(vec![*bob.address()], 1).unwrap(),
        Integer::from_whole(5),
    );
    let mut signed = builder.build(&[], &mut rng).unwrap();

    // The view the API hands out is the one-time key less the spend key.
    let zero = Key([0; 32]);
    let view = derive_ghost_private(&inputs[0].mask, alice.private_view(), &zero, 1, 5).unwrap();

    let signer = TxSigner::new(*alice.private_spend());
    signer
        .sign_with_views(&mut signed, &inputs, &[view])
        .unwrap();
    assert_eq!(signed.verify_signatures(&keys_of(&inputs)), Ok(()));

    let raw = signed.raw().unwrap();
    let decoded = SignedTransaction::decode(&raw).unwrap();
    match &decoded.transaction().signatures {
        mixin_transaction_core::TxSignatures::Map(groups) => {
            assert_eq!(groups[0].keys().copied().collect::<Vec<_>>(), vec![1]);
        }
        other => panic!("unexpected signatures {other:?}"),
    }
}

#[test]
fn multisig_members_sign_their_own_slots() {
    let mut rng = StdRng::seed_from_u64(23);
    let alice = AccountKey::random(&mut rng);
    let bob = AccountKey::random(&mut rng);
    let carol = AccountKey::random(&mut rng);

    let inputs = vec![received(&mut rng, &[&alice, &bob], 2, b"vault", 9)];
    let mut builder = TransactionBuilder::new();
    builder.add_input(inputs[0].clone());
    builder.add_output(
        MixAddress::new_xin(vec![*carol.address()], 1).unwrap(),
        Integer::from_whole(4),
    );
    let mut signed = builder.build(&[], &mut rng).unwrap();
    assert_eq!(signed.transaction().outputs[1].keys.len(), 2);

    let zero = Key([0; 32]);
    let alice_view =
        derive_ghost_private(&inputs[0].mask, alice.private_view(), &zero, 1, 5).unwrap();
    let bob_view = derive_ghost_private(&inputs[0].mask, bob.private_view(), &zero, 1, 5).unwrap();

    let alice_signer = TxSigner::new(*alice.private_spend());
    assert_matches!(
        alice_signer.sign_input(&mut signed, 0, &inputs[0], &alice_view, Some(1)),
        Err(TxBuilderError::Signature(SignatureError::PublicKeyMismatch(0)))
    );
    alice_signer
        .sign_input(&mut signed, 0, &inputs[0], &alice_view, Some(0))
        .unwrap();
    TxSigner::new(*bob.private_spend())
        .sign_input(&mut signed, 0, &inputs[0], &bob_view, Some(1))
        .unwrap();

    assert_eq!(signed.verify_signatures(&keys_of(&inputs)), Ok(()));
}

#[test]
fn signer_rejects_foreign_inputs() {
    let mut rng = StdRng::seed_from_u64(24);
    let alice = AccountKey::random(&mut rng);
    let mallory = AccountKey::random(&mut rng);

    let inputs = vec![received(&mut rng, &[&alice], 1, b"mine", 1)];
    let mut builder = TransactionBuilder::new();
    builder.add_input(inputs[0].clone());
    builder.add_output(
        MixAddress::new_xin(vec![*mallory.address()], 1).unwrap(),
        Integer::from_whole(1),
    );
    let mut signed = builder.build(&[], &mut rng).unwrap();

    assert_matches!(
        TxSigner::sign_with_account(&mallory, &mut signed, &inputs),
        Err(TxBuilderError::Signature(SignatureError::PublicKeyMismatch(0)))
    );

    let other = vec![received(&mut rng, &[&alice], 1, b"not spent here", 1)];
    assert_matches!(
        TxSigner::sign_with_account(&alice, &mut signed, &other),
        Err(TxBuilderError::InputMismatch(0))
    );

    assert_matches!(
        TxSigner::new(*alice.private_spend()).sign_with_views(&mut signed, &inputs, &[]),
        Err(TxBuilderError::ViewCountMismatch(1, 0))
    );
}

#[test]
fn failed_signing_leaves_signatures_untouched() {
    let mut rng = StdRng::seed_from_u64(25);
    let alice = AccountKey::random(&mut rng);
    let bob = AccountKey::random(&mut rng);

    let inputs = vec![
        received(&mut rng, &[&alice], 1, b"good", 2),
        received(&mut rng, &[&alice], 1, b"bad", 2),
    ];
    let mut builder = TransactionBuilder::new();
    for input in &inputs {
        builder.add_input(input.clone());
    }
    builder.add_output(
        MixAddress::new_xin(vec![*bob.address()], 1).unwrap(),
        Integer::from_whole(4),
    );
    let mut signed = builder.build(&[], &mut rng).unwrap();
    let before = signed.clone();

    let zero = Key([0; 32]);
    let good = derive_ghost_private(&inputs[0].mask, alice.private_view(), &zero, 1, 5).unwrap();
    let signer = TxSigner::new(*alice.private_spend());
    assert_matches!(
        signer.sign_with_views(&mut signed, &inputs, &[good, Key([9; 32])]),
        Err(TxBuilderError::Signature(SignatureError::PublicKeyMismatch(1)))
    );
    assert!(signed.transaction().signatures.is_empty());
    assert_eq!(signed, before);

    // The second input belongs to bob, so alice cannot finish signing.
    let mixed = vec![
        inputs[0].clone(),
        received(&mut rng, &[&bob], 1, b"bad", 2),
    ];
    assert_matches!(
        TxSigner::sign_with_account(&alice, &mut signed, &mixed),
        Err(TxBuilderError::Signature(SignatureError::PublicKeyMismatch(1)))
    );
    assert_eq!(signed, before);
}
