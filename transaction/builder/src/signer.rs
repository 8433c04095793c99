// Copyright (c) 2024 Botho Foundation

//! Signing the inputs of a sealed transaction.

use crate::{SpendableOutput, TxBuilderError};
use mixin_account_keys::AccountKey;
use mixin_crypto_ghost_keys::derive_ghost_private;
use mixin_crypto_keys::{public, sign_hash, Hash, Key, Signature};
use mixin_transaction_core::{SignatureError, SignedTransaction};
use tracing::debug;
use zeroize::Zeroize;

/// Signs inputs with a private spend key.
///
/// The one-time key of an input is its view scalar plus the spend scalar.
/// The view scalar either comes from the API, one per input, or is derived
/// locally from the output mask when the signer also holds the view key.
pub struct TxSigner {
    spend: Key,
}

impl TxSigner {
    pub fn new(private_spend: Key) -> Self {
        Self {
            spend: private_spend,
        }
    }

    /// Sign every input with the per-input views returned by the API. The
    /// slot of each signature is found by matching the one-time public key
    /// against the keys of the spent output.
    pub fn sign_with_views(
        &self,
        tx: &mut SignedTransaction,
        inputs: &[SpendableOutput],
        views: &[Key],
    ) -> Result<(), TxBuilderError> {
        if views.len() != inputs.len() {
            return Err(TxBuilderError::ViewCountMismatch(inputs.len(), views.len()));
        }
        check_inputs(tx, inputs)?;
        let hash = sealed_hash(tx)?;
        let signatures = inputs
            .iter()
            .zip(views)
            .enumerate()
            .map(|(i, (input, view))| {
                let mut one_time = self.one_time_key(view)?;
                let result = input_signature(&hash, i, input, &one_time, None);
                one_time.zeroize();
                result
            })
            .collect::<Result<Vec<_>, _>>()?;
        place_signatures(tx, signatures)
    }

    /// Sign input `index` of `tx` with `view`.
    ///
    /// # Arguments
    /// * `slot` - Position of the signer's key within the output's keys.
    ///   Multisig callers that know their slot pass it; otherwise it is found
    ///   by matching the one-time public key.
    pub fn sign_input(
        &self,
        tx: &mut SignedTransaction,
        index: usize,
        input: &SpendableOutput,
        view: &Key,
        slot: Option<usize>,
    ) -> Result<(), TxBuilderError> {
        let hash = sealed_hash(tx)?;
        let mut one_time = self.one_time_key(view)?;
        let result = input_signature(&hash, index, input, &one_time, slot);
        one_time.zeroize();
        place_signatures(tx, vec![result?])
    }

    fn one_time_key(&self, view: &Key) -> Result<Key, TxBuilderError> {
        Ok(Key::from_scalar(&(view.as_scalar()? + self.spend.as_scalar()?)))
    }

    /// Sign every input with one-time keys derived from the outputs' masks
    /// and the account's view and spend keys.
    pub fn sign_with_account(
        account: &AccountKey,
        tx: &mut SignedTransaction,
        inputs: &[SpendableOutput],
    ) -> Result<(), TxBuilderError> {
        check_inputs(tx, inputs)?;
        let hash = sealed_hash(tx)?;
        let signatures = inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                let mut one_time = derive_ghost_private(
                    &input.mask,
                    account.private_view(),
                    account.private_spend(),
                    input.output_index,
                    input.transaction_version,
                )?;
                let result = input_signature(&hash, i, input, &one_time, None);
                one_time.zeroize();
                result
            })
            .collect::<Result<Vec<_>, _>>()?;
        place_signatures(tx, signatures)
    }
}

impl Drop for TxSigner {
    fn drop(&mut self) {
        self.spend.zeroize();
    }
}

fn sealed_hash(tx: &SignedTransaction) -> Result<Hash, TxBuilderError> {
    Ok(tx.hash().ok_or(SignatureError::NotSealed)?)
}

/// The spendable outputs must be the transaction's inputs, in order.
fn check_inputs(tx: &SignedTransaction, inputs: &[SpendableOutput]) -> Result<(), TxBuilderError> {
    let tx_inputs = &tx.transaction().inputs;
    if tx_inputs.len() != inputs.len() {
        return Err(SignatureError::InputCountMismatch(tx_inputs.len(), inputs.len()).into());
    }
    for (i, (tx_input, input)) in tx_inputs.iter().zip(inputs).enumerate() {
        if !input.is_outpoint(&tx_input.hash, tx_input.index) {
            return Err(TxBuilderError::InputMismatch(i));
        }
    }
    Ok(())
}

/// A signature of input `index` and the slot it belongs in.
struct InputSignature {
    index: usize,
    slot: u16,
    sig: Signature,
}

fn input_signature(
    hash: &Hash,
    index: usize,
    input: &SpendableOutput,
    one_time: &Key,
    slot: Option<usize>,
) -> Result<InputSignature, TxBuilderError> {
    let public_key = public(one_time)?;
    let slot = match slot {
        Some(slot) if input.keys.get(slot) == Some(&public_key) => slot,
        Some(_) => return Err(SignatureError::PublicKeyMismatch(index).into()),
        None => input
            .keys
            .iter()
            .position(|key| *key == public_key)
            .ok_or(SignatureError::PublicKeyMismatch(index))?,
    };
    debug!("Signing input {} at slot {}", index, slot);
    Ok(InputSignature {
        index,
        slot: slot as u16,
        sig: sign_hash(one_time, hash)?,
    })
}

/// Attach signatures only once every input has been signed, so a failure
/// leaves the transaction as it was.
fn place_signatures(
    tx: &mut SignedTransaction,
    signatures: Vec<InputSignature>,
) -> Result<(), TxBuilderError> {
    let mut staged = tx.clone();
    for InputSignature { index, slot, sig } in signatures {
        staged.set_signature(index, slot, sig)?;
    }
    *tx = staged;
    Ok(())
}
