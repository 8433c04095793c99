// Copyright (c) 2024 Botho Foundation

//! Receive an output through ghost keys, then spend it.

use mixin_crypto_ghost_keys::{derive_ghost_private, GhostKeys};
use mixin_crypto_keys::{public, sign_hash, Hash, Key};
use mixin_transaction_core::{
    constants::XIN_ASSET_ID, validation::validate_spending, validation::SpentOutput, Integer,
    Output, Script, SignedTransaction, Transaction,
};
use rand::{rngs::StdRng, SeedableRng};

struct Wallet {
    view: Key,
    spend: Key,
}

impl Wallet {
    fn new(rng: &mut StdRng) -> Self {
        Self {
            view: Key::random(rng),
            spend: Key::random(rng),
        }
    }

    fn receiver(&self) -> (Key, Key) {
        (public(&self.view).unwrap(), public(&self.spend).unwrap())
    }
}

#[test]
fn receive_then_spend() {
    let mut rng = StdRng::seed_from_u64(99);
    let alice = Wallet::new(&mut rng);
    let bob = Wallet::new(&mut rng);

    // Funding transaction: output 0 pays alice.
    let ghost = GhostKeys::create(&mut rng, &[alice.receiver()], 0, 5).unwrap();
    let mut funding = Transaction::new(5, XIN_ASSET_ID);
    funding.add_input(Hash::sha3_256(b"coinbase"), 0);
    funding.outputs.push(Output::new_script_output(
        Integer::from_whole(10),
        ghost.keys.clone(),
        ghost.mask,
        Script::new_threshold(1),
    ));
    let funding_hash = funding.payload_hash().unwrap();

    assert_eq!(
        ghost
            .find_owned(&alice.view, &alice.receiver().1, 0, 5)
            .unwrap(),
        Some(0)
    );
    assert_eq!(
        ghost.find_owned(&bob.view, &bob.receiver().1, 0, 5).unwrap(),
        None
    );

    // Spending transaction: alice pays bob 4 and keeps 6.
    let mut spending = Transaction::new(5, XIN_ASSET_ID);
    spending.add_input(funding_hash, 0);
    for (index, (amount, wallet)) in [(4u64, &bob), (6, &alice)].into_iter().enumerate() {
        let keys = GhostKeys::create(&mut rng, &[wallet.receiver()], index as u8, 5).unwrap();
        spending.outputs.push(Output::new_script_output(
            Integer::from_whole(amount),
            keys.keys,
            keys.mask,
            Script::new_threshold(1),
        ));
    }

    let mut signed = SignedTransaction::draft(spending);
    let hash = signed.seal().unwrap();

    let one_time = derive_ghost_private(&ghost.mask, &alice.view, &alice.spend, 0, 5).unwrap();
    assert_eq!(public(&one_time).unwrap(), ghost.keys[0]);
    signed
        .set_signature(0, 0, sign_hash(&one_time, &hash).unwrap())
        .unwrap();

    let spent = SpentOutput {
        asset: XIN_ASSET_ID,
        amount: Integer::from_whole(10),
        keys: ghost.keys.clone(),
        script: Script::new_threshold(1),
    };
    assert_eq!(validate_spending(signed.transaction(), &[spent]), Ok(()));
    assert_eq!(signed.verify_signatures(&[ghost.keys.clone()]), Ok(()));

    let relayed = SignedTransaction::decode(&signed.raw().unwrap()).unwrap();
    assert_eq!(relayed.hash(), Some(hash));
    assert_eq!(relayed.verify_signatures(&[ghost.keys]), Ok(()));
}
