// Copyright (c) 2024 Botho Foundation

use mixin_account_keys::MixAddress;
use mixin_crypto_keys::{Hash, Key};
use mixin_transaction_core::{validation::SpentOutput, Integer, Script};
use serde::{Deserialize, Serialize};

/// An unspent output the caller controls, with everything needed to spend
/// it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SpendableOutput {
    /// Hash of the transaction that created the output.
    pub transaction_hash: Hash,

    /// Position of the output in that transaction.
    pub output_index: u8,

    /// Version of that transaction. Selects the ghost-key hash family.
    pub transaction_version: u8,

    pub asset: Hash,
    pub amount: Integer,

    /// The output's ghost-key mask `R`.
    pub mask: Key,

    /// The output's one-time keys, one per receiver.
    pub keys: Vec<Key>,

    /// Receivers and threshold the output was sent to. Change returns here.
    pub owner: MixAddress,
}

impl SpendableOutput {
    /// The on-chain view of this output, for
    /// [`validate_spending`](mixin_transaction_core::validation::validate_spending).
    pub fn spent_output(&self) -> SpentOutput {
        SpentOutput {
            asset: self.asset,
            amount: self.amount,
            keys: self.keys.clone(),
            script: Script::new_threshold(self.owner.threshold()),
        }
    }

    /// Whether `(hash, index)` names this output.
    pub fn is_outpoint(&self, hash: &Hash, index: u8) -> bool {
        self.transaction_hash == *hash && self.output_index == index
    }
}
