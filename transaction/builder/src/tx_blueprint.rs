// Copyright (c) 2024 Botho Foundation

use crate::{unique_object_id, SpendableOutput, TxBuilderError};
use mixin_account_keys::{Address, MixAddress, MixMembers};
use mixin_crypto_ghost_keys::GhostKeys;
use mixin_crypto_keys::Hash;
use mixin_transaction_core::{
    Integer, Output, Script, SignedTransaction, Transaction, TransactionExtra, TxSignatures,
};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

/// The information we need to build an output
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum TxBlueprintOutput {
    /// A normal output to a recipient address
    Recipient {
        /// The recipient of the output.
        recipient: MixAddress,

        /// The amount being sent.
        amount: Integer,
    },

    /// A change output, returned to the owner of the first input
    Change {
        /// Destination of the change output
        change_destination: MixAddress,

        /// The amount being returned.
        amount: Integer,
    },
}

impl TxBlueprintOutput {
    pub fn address(&self) -> &MixAddress {
        match self {
            TxBlueprintOutput::Recipient { recipient, .. } => recipient,
            TxBlueprintOutput::Change {
                change_destination, ..
            } => change_destination,
        }
    }

    pub fn amount(&self) -> Integer {
        match self {
            TxBlueprintOutput::Recipient { amount, .. }
            | TxBlueprintOutput::Change { amount, .. } => *amount,
        }
    }
}

/// One entry of a ghost-key request to the API: keys for the user ids of
/// output `index`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GhostKeyRequest {
    pub receivers: Vec<Uuid>,
    pub index: u8,
    pub hint: Uuid,
}

/// Source material for an unsigned transaction.
///
/// A `TxBlueprint` has passed every check of the builder and carries its
/// outputs in final order, change last. What it lacks are the ghost keys of
/// the outputs: those for user-id receivers come from the API
/// ([`TxBlueprint::ghost_key_requests`]), the others are derived locally in
/// [`TxBlueprint::build`].
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TxBlueprint {
    /// Transaction version
    pub version: u8,

    /// The asset every input and output carries
    pub asset: Hash,

    /// The outputs being spent, in input order
    pub inputs: Vec<SpendableOutput>,

    /// Outputs
    pub outputs: Vec<TxBlueprintOutput>,

    /// Memo
    pub extra: TransactionExtra,

    /// Referenced transactions
    pub references: Vec<Hash>,

    /// Seed of the per-output ghost-key hints
    pub hint: String,
}

impl TxBlueprint {
    /// The ghost keys to fetch, one per output addressed to user ids, in
    /// output order.
    pub fn ghost_key_requests(&self) -> Vec<GhostKeyRequest> {
        self.outputs
            .iter()
            .enumerate()
            .filter_map(|(index, output)| match output.address().members() {
                MixMembers::Uuid(receivers) => {
                    let index = index as u8;
                    Some(GhostKeyRequest {
                        receivers: receivers.clone(),
                        index,
                        hint: unique_object_id(&self.hint, index),
                    })
                }
                MixMembers::Xin(_) => None,
            })
            .collect()
    }

    /// Materialize the outputs and seal the transaction.
    ///
    /// # Arguments
    /// * `fetched` - Ghost keys answering [`TxBlueprint::ghost_key_requests`],
    ///   in the same order.
    /// * `rng` - Source of the mask scalars of locally derived outputs.
    pub fn build<RNG: CryptoRng + RngCore>(
        &self,
        fetched: &[GhostKeys],
        rng: &mut RNG,
    ) -> Result<SignedTransaction, TxBuilderError> {
        let expected = self
            .outputs
            .iter()
            .filter(|output| output.address().is_uuid())
            .count();
        if fetched.len() != expected {
            return Err(TxBuilderError::GhostKeyCountMismatch(
                expected,
                fetched.len(),
            ));
        }

        let mut tx = Transaction::new(self.version, self.asset);
        for input in &self.inputs {
            tx.add_input(input.transaction_hash, input.output_index);
        }

        let mut fetched = fetched.iter();
        for (index, output) in self.outputs.iter().enumerate() {
            let address = output.address();
            let ghost = match address.members() {
                MixMembers::Uuid(_) => fetched
                    .next()
                    .cloned()
                    .ok_or(TxBuilderError::GhostKeyCountMismatch(expected, index))?,
                MixMembers::Xin(members) => {
                    create_xin_ghost_keys(rng, members, index as u8, self.version)?
                }
            };
            if ghost.keys.len() != address.members_len() {
                return Err(TxBuilderError::GhostKeyMismatch(index));
            }
            tx.outputs.push(Output::new_script_output(
                output.amount(),
                ghost.keys,
                ghost.mask,
                Script::new_threshold(address.threshold()),
            ));
        }

        tx.references = self.references.clone();
        tx.extra = self.extra.clone();
        tx.signatures = TxSignatures::Map(vec![BTreeMap::new(); self.inputs.len()]);

        let mut signed = SignedTransaction::draft(tx);
        let hash = signed.seal()?;
        debug!(
            "Built transaction {} with {} inputs and {} outputs",
            hash,
            self.inputs.len(),
            self.outputs.len()
        );
        Ok(signed)
    }
}

/// Ghost keys for XIN members. Each member is treated as a public address,
/// its view key derived from its spend key.
fn create_xin_ghost_keys<RNG: CryptoRng + RngCore>(
    rng: &mut RNG,
    members: &[Address],
    index: u8,
    version: u8,
) -> Result<GhostKeys, TxBuilderError> {
    let receivers = members
        .iter()
        .map(|member| Ok(Address::from_public_spend(*member.public_spend())?.ghost_receiver()))
        .collect::<Result<Vec<_>, TxBuilderError>>()?;
    Ok(GhostKeys::create(rng, &receivers, index, version)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ghost_key_request_json() {
        let request = GhostKeyRequest {
            receivers: vec![Uuid::nil()],
            index: 2,
            hint: Uuid::nil(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "receivers": ["00000000-0000-0000-0000-000000000000"],
                "index": 2,
                "hint": "00000000-0000-0000-0000-000000000000",
            })
        );
    }
}
