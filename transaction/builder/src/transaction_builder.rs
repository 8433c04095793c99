// Copyright (c) 2024 Botho Foundation

//! Utility for building a kernel transaction from outputs the caller
//! controls.

use crate::{SpendableOutput, TxBlueprint, TxBlueprintOutput, TxBuilderError};
use mixin_account_keys::MixAddress;
use mixin_crypto_ghost_keys::GhostKeys;
use mixin_crypto_keys::Hash;
use mixin_transaction_core::{
    constants::{
        EXTRA_SIZE_GENERAL_LIMIT, REFERENCES_COUNT_LIMIT, SLICE_COUNT_LIMIT,
        TX_VERSION_COMMON_ENCODING, TX_VERSION_LATEST,
    },
    Integer, SignedTransaction, TransactionExtra,
};
use rand_core::{CryptoRng, RngCore};
use tracing::debug;

/// Helper utility for building a transaction that spends a set of outputs
/// to a set of recipients, returning whatever is left to the owner of the
/// first input.
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    /// The transaction version we are targeting
    version: u8,
    /// The outputs being spent.
    inputs: Vec<SpendableOutput>,
    /// The recipients and their amounts, in output order.
    recipients: Vec<(MixAddress, Integer)>,
    /// Memo carried in the transaction extra.
    memo: TransactionExtra,
    /// Referenced transactions.
    references: Vec<Hash>,
    /// Seed for the ghost-key hints. Defaults to the first spent output.
    hint: Option<String>,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self {
            version: TX_VERSION_LATEST,
            inputs: Vec::new(),
            recipients: Vec::new(),
            memo: TransactionExtra::default(),
            references: Vec::new(),
            hint: None,
        }
    }
}

impl TransactionBuilder {
    /// Initializes a new TransactionBuilder for the latest version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes a new TransactionBuilder for an older binary version.
    ///
    /// # Arguments
    /// * `version` - Transaction version, from the first binary encoding to
    ///   the latest
    pub fn with_version(version: u8) -> Result<Self, TxBuilderError> {
        if !(TX_VERSION_COMMON_ENCODING..=TX_VERSION_LATEST).contains(&version) {
            return Err(TxBuilderError::UnsupportedVersion(version));
        }
        Ok(Self {
            version,
            ..Self::default()
        })
    }

    /// Add an output to spend.
    pub fn add_input(&mut self, input: SpendableOutput) {
        self.inputs.push(input);
    }

    /// Pay `amount` to `recipient`.
    pub fn add_output(&mut self, recipient: MixAddress, amount: Integer) {
        self.recipients.push((recipient, amount));
    }

    pub fn set_memo(&mut self, memo: impl Into<TransactionExtra>) {
        self.memo = memo.into();
    }

    pub fn add_reference(&mut self, reference: Hash) {
        self.references.push(reference);
    }

    pub fn set_hint(&mut self, hint: impl Into<String>) {
        self.hint = Some(hint.into());
    }

    /// Check the inputs and recipients, balance them with a change output
    /// and return the blueprint of the transaction.
    pub fn build_blueprint(self) -> Result<TxBlueprint, TxBuilderError> {
        let first = self.inputs.first().ok_or(TxBuilderError::NoInputs)?;
        if self.recipients.is_empty() {
            return Err(TxBuilderError::NoRecipients);
        }
        if self.inputs.len() > SLICE_COUNT_LIMIT {
            return Err(TxBuilderError::TooManyInputs(self.inputs.len()));
        }
        // Room is kept for the change output.
        if self.recipients.len() + 1 > SLICE_COUNT_LIMIT {
            return Err(TxBuilderError::TooManyOutputs(self.recipients.len() + 1));
        }
        if self.memo.len() > EXTRA_SIZE_GENERAL_LIMIT {
            return Err(TxBuilderError::MemoTooLong(self.memo.len()));
        }
        if self.references.len() > REFERENCES_COUNT_LIMIT {
            return Err(TxBuilderError::TooManyReferences(self.references.len()));
        }

        let asset = first.asset;
        let mut total = Integer::ZERO;
        for input in &self.inputs {
            if input.asset != asset {
                return Err(TxBuilderError::MixedAssets(asset, input.asset));
            }
            total = total.checked_add(input.amount)?;
        }

        let mut remaining = total;
        let mut requested = Integer::ZERO;
        let mut outputs = Vec::with_capacity(self.recipients.len() + 1);
        for (i, (recipient, amount)) in self.recipients.into_iter().enumerate() {
            if amount.is_zero() {
                return Err(TxBuilderError::ZeroAmount(i));
            }
            requested = requested.checked_add(amount)?;
            remaining = remaining
                .checked_sub(amount)
                .map_err(|_| TxBuilderError::InsufficientFunds(total, requested))?;
            outputs.push(TxBlueprintOutput::Recipient { recipient, amount });
        }

        if !remaining.is_zero() {
            debug!("Appending change output of {}", remaining);
            outputs.push(TxBlueprintOutput::Change {
                change_destination: first.owner.clone(),
                amount: remaining,
            });
        }

        let hint = self
            .hint
            .unwrap_or_else(|| format!("{}:{}", first.transaction_hash, first.output_index));

        Ok(TxBlueprint {
            version: self.version,
            asset,
            inputs: self.inputs,
            outputs,
            extra: self.memo,
            references: self.references,
            hint,
        })
    }

    /// Consume the builder and return the sealed, unsigned transaction.
    ///
    /// # Arguments
    /// * `fetched` - Ghost keys for the outputs addressed to user ids, see
    ///   [`TxBlueprint::ghost_key_requests`]
    /// * `rng` - Randomness for the locally derived ghost keys
    pub fn build<RNG: CryptoRng + RngCore>(
        self,
        fetched: &[GhostKeys],
        rng: &mut RNG,
    ) -> Result<SignedTransaction, TxBuilderError> {
        self.build_blueprint()?.build(fetched, rng)
    }
}
