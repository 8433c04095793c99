// Copyright (c) 2024 Botho Foundation

//! A transaction together with its lifecycle state and cached hash.

use crate::{
    validation::validate, AggregatedSignature, SignatureError, StateError, Transaction,
    TransactionError, TxSignatures,
};
use mixin_crypto_keys::{verify_hash, EdwardsPoint, Hash, Key, Signature};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a transaction is in its life.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum TxState {
    /// Inputs, outputs, extra and references may still change.
    Draft,
    /// Validated, hash cached, ready for signatures.
    Built,
    /// Handed to the network.
    Submitted,
    /// Accepted into a snapshot.
    Mined,
    /// Refused by the network.
    Rejected,
}

impl TxState {
    /// Whether `next` is a legal step forward from `self`.
    pub fn can_advance_to(self, next: TxState) -> bool {
        matches!(
            (self, next),
            (TxState::Draft, TxState::Built)
                | (TxState::Built, TxState::Submitted)
                | (TxState::Built, TxState::Rejected)
                | (TxState::Submitted, TxState::Mined)
                | (TxState::Submitted, TxState::Rejected)
        )
    }
}

/// A transaction moving from draft to the network.
///
/// Once [`SignedTransaction::seal`] has cached the hash, the body is frozen
/// and only signatures may be attached.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignedTransaction {
    tx: Transaction,
    state: TxState,
    hash: Option<Hash>,
}

impl SignedTransaction {
    /// Wrap a draft.
    pub fn draft(tx: Transaction) -> Self {
        Self {
            tx,
            state: TxState::Draft,
            hash: None,
        }
    }

    /// Decode raw bytes into a built transaction with its hash cached.
    pub fn decode(bytes: &[u8]) -> Result<Self, TransactionError> {
        let tx = Transaction::unmarshal(bytes)?;
        let hash = tx.payload_hash()?;
        Ok(Self {
            tx,
            state: TxState::Built,
            hash: Some(hash),
        })
    }

    pub fn from_hex(s: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(s).map_err(|_| crate::DecodeError::InvalidHex)?;
        Self::decode(&bytes)
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    pub fn into_transaction(self) -> Transaction {
        self.tx
    }

    /// Mutable access to the body, refused once the hash is cached.
    pub fn transaction_mut(&mut self) -> Result<&mut Transaction, StateError> {
        if self.hash.is_some() {
            return Err(StateError::Sealed);
        }
        Ok(&mut self.tx)
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    /// The cached hash, present from [`TxState::Built`] on.
    pub fn hash(&self) -> Option<Hash> {
        self.hash
    }

    /// Validate the draft, cache its hash and move to [`TxState::Built`].
    pub fn seal(&mut self) -> Result<Hash, TransactionError> {
        if let Some(hash) = self.hash {
            return Ok(hash);
        }
        validate(&self.tx)?;
        let hash = self.tx.payload_hash()?;
        self.advance(TxState::Built)?;
        self.hash = Some(hash);
        Ok(hash)
    }

    /// Step the lifecycle forward.
    pub fn advance(&mut self, next: TxState) -> Result<(), StateError> {
        if !self.state.can_advance_to(next) {
            return Err(StateError::InvalidTransition(self.state, next));
        }
        self.state = next;
        Ok(())
    }

    /// Place `sig` for signer `signer` of input `input`.
    pub fn set_signature(
        &mut self,
        input: usize,
        signer: u16,
        sig: Signature,
    ) -> Result<(), SignatureError> {
        if self.hash.is_none() {
            return Err(SignatureError::NotSealed);
        }
        let inputs = self.tx.inputs.len();
        if input >= inputs {
            return Err(SignatureError::InputOutOfRange(input));
        }
        if !matches!(self.tx.signatures, TxSignatures::Map(_)) {
            self.tx.signatures = TxSignatures::default();
        }
        if let TxSignatures::Map(groups) = &mut self.tx.signatures {
            if groups.len() < inputs {
                groups.resize(inputs, BTreeMap::new());
            }
            groups[input].insert(signer, sig);
        }
        Ok(())
    }

    /// Replace every signature with one aggregated signature.
    pub fn set_aggregated_signature(
        &mut self,
        agg: AggregatedSignature,
    ) -> Result<(), SignatureError> {
        if self.hash.is_none() {
            return Err(SignatureError::NotSealed);
        }
        self.tx.signatures = TxSignatures::Aggregated(agg);
        Ok(())
    }

    /// Encoded bytes with signatures.
    pub fn raw(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(self.tx.marshal()?)
    }

    pub fn raw_hex(&self) -> Result<String, TransactionError> {
        Ok(hex::encode(self.raw()?))
    }

    /// Check every signature against the keys of the outputs being spent,
    /// one key list per input in input order.
    ///
    /// Per-input signatures are checked one by one against
    /// `keys_per_input[input][signer]`. An aggregated signature is checked
    /// against the sum of the keys at its signer positions, counted across
    /// all inputs' keys laid end to end.
    pub fn verify_signatures(&self, keys_per_input: &[Vec<Key>]) -> Result<(), SignatureError> {
        let hash = self.hash.ok_or(SignatureError::NotSealed)?;
        let inputs = self.tx.inputs.len();
        if keys_per_input.len() != inputs {
            return Err(SignatureError::InputCountMismatch(
                inputs,
                keys_per_input.len(),
            ));
        }

        match &self.tx.signatures {
            TxSignatures::Map(groups) => {
                if groups.len() != inputs {
                    return Err(SignatureError::InputCountMismatch(inputs, groups.len()));
                }
                for (input, (group, keys)) in groups.iter().zip(keys_per_input).enumerate() {
                    if group.is_empty() {
                        return Err(SignatureError::MissingSignatures(input));
                    }
                    for (signer, sig) in group {
                        let key = keys
                            .get(*signer as usize)
                            .ok_or(SignatureError::SignerOutOfRange {
                                input,
                                signer: *signer,
                            })?;
                        if !verify_hash(key, &hash, sig) {
                            return Err(SignatureError::InvalidSignature {
                                input,
                                signer: *signer,
                            });
                        }
                    }
                }
                Ok(())
            }
            TxSignatures::Aggregated(agg) => {
                if agg.signers().is_empty() {
                    return Err(SignatureError::InvalidAggregatedSignature);
                }
                let flat: Vec<&Key> = keys_per_input.iter().flatten().collect();
                let mut combined = EdwardsPoint::default();
                for signer in agg.signers() {
                    let key = flat.get(*signer as usize).ok_or_else(|| {
                        SignatureError::SignerOutOfRange {
                            input: input_of(keys_per_input, *signer as usize),
                            signer: *signer,
                        }
                    })?;
                    combined += key.as_point()?;
                }
                if !verify_hash(&Key::from_point(&combined), &hash, &agg.signature) {
                    return Err(SignatureError::InvalidAggregatedSignature);
                }
                Ok(())
            }
        }
    }
}

/// The input a flattened key position falls in, or the input count when it
/// is past the end.
fn input_of(keys_per_input: &[Vec<Key>], mut position: usize) -> usize {
    for (input, keys) in keys_per_input.iter().enumerate() {
        if position < keys.len() {
            return input;
        }
        position -= keys.len();
    }
    keys_per_input.len()
}
