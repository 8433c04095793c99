// Copyright (c) 2024 Botho Foundation

use super::error::{TransactionValidationError, TransactionValidationResult};
use crate::{Output, Transaction};
use mixin_crypto_keys::{Hash, Key};
use mixin_transaction_types::{
    constants::{
        REFERENCES_COUNT_LIMIT, SLICE_COUNT_LIMIT, TX_VERSION_LATEST, TX_VERSION_REFERENCES,
    },
    Integer, OutputType, Script,
};
use std::collections::HashSet;

/// The output an input spends, as recorded on chain.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpentOutput {
    pub asset: Hash,
    pub amount: Integer,
    pub keys: Vec<Key>,
    pub script: Script,
}

/// Determines if the transaction is well formed on its own, without
/// looking at the outputs it spends.
pub fn validate(tx: &Transaction) -> TransactionValidationResult<()> {
    if tx.version > TX_VERSION_LATEST {
        return Err(TransactionValidationError::UnsupportedVersion(tx.version));
    }

    validate_number_of_inputs(tx, SLICE_COUNT_LIMIT)?;

    validate_number_of_outputs(tx, SLICE_COUNT_LIMIT)?;

    validate_references(tx)?;

    validate_extra(tx)?;

    validate_inputs(tx)?;

    for (i, output) in tx.outputs.iter().enumerate() {
        validate_output(i, output)?;
    }

    Ok(())
}

/// The transaction must have at least one input, and no more than the maximum
/// allowed number of inputs.
pub fn validate_number_of_inputs(
    tx: &Transaction,
    maximum_allowed_inputs: usize,
) -> TransactionValidationResult<()> {
    let num_inputs = tx.inputs.len();
    if num_inputs == 0 {
        return Err(TransactionValidationError::NoInputs);
    }
    if num_inputs > maximum_allowed_inputs {
        return Err(TransactionValidationError::TooManyInputs(num_inputs));
    }
    Ok(())
}

/// The transaction must have at least one output, and no more than the
/// maximum allowed number of outputs.
pub fn validate_number_of_outputs(
    tx: &Transaction,
    maximum_allowed_outputs: usize,
) -> TransactionValidationResult<()> {
    let num_outputs = tx.outputs.len();
    if num_outputs == 0 {
        return Err(TransactionValidationError::NoOutputs);
    }
    if num_outputs > maximum_allowed_outputs {
        return Err(TransactionValidationError::TooManyOutputs(num_outputs));
    }
    Ok(())
}

/// References exist from version 4 and are capped at two.
pub fn validate_references(tx: &Transaction) -> TransactionValidationResult<()> {
    if tx.references.is_empty() {
        return Ok(());
    }
    if tx.version < TX_VERSION_REFERENCES {
        return Err(TransactionValidationError::ReferencesNotSupported(
            tx.version,
        ));
    }
    if tx.references.len() > REFERENCES_COUNT_LIMIT {
        return Err(TransactionValidationError::TooManyReferences(
            tx.references.len(),
        ));
    }
    Ok(())
}

/// The extra must fit the limit the transaction has paid for.
pub fn validate_extra(tx: &Transaction) -> TransactionValidationResult<()> {
    let limit = tx.extra_limit();
    if tx.extra.len() > limit {
        return Err(TransactionValidationError::ExtraTooLarge(
            tx.extra.len(),
            limit,
        ));
    }
    Ok(())
}

/// Each input takes exactly one shape, and no UTXO is spent twice.
pub fn validate_inputs(tx: &Transaction) -> TransactionValidationResult<()> {
    let mut seen = HashSet::new();
    for (i, input) in tx.inputs.iter().enumerate() {
        let shapes = [
            !input.genesis.is_empty(),
            input.deposit.is_some(),
            input.mint.is_some(),
        ]
        .iter()
        .filter(|s| **s)
        .count();
        if shapes > 1 || (shapes == 1 && input.hash.has_value()) {
            return Err(TransactionValidationError::InvalidInputShape(i));
        }
        if shapes == 0 && !seen.insert((input.hash, input.index)) {
            return Err(TransactionValidationError::DuplicateInput(
                input.hash,
                input.index,
            ));
        }
    }
    Ok(())
}

/// Structural rules for one output.
pub fn validate_output(index: usize, output: &Output) -> TransactionValidationResult<()> {
    if output.amount.is_zero() {
        return Err(TransactionValidationError::NonPositiveAmount(index));
    }

    if (output.output_type == OutputType::WithdrawalSubmit) != output.withdrawal.is_some() {
        return Err(TransactionValidationError::InvalidWithdrawal(index));
    }

    if output.output_type == OutputType::Script {
        output
            .script
            .validate(output.keys.len())
            .map_err(|e| TransactionValidationError::InvalidScript(index, e))?;
        if !output.mask.is_valid_point() || !output.keys.iter().all(Key::is_valid_point) {
            return Err(TransactionValidationError::InvalidOutputKey(index));
        }
    }
    Ok(())
}

/// Check the transaction against the outputs its UTXO inputs spend, given
/// in input order: every one must carry the transaction's asset, and the
/// inputs (spent outputs plus any deposit or mint) must exactly cover the
/// outputs.
pub fn validate_spending(
    tx: &Transaction,
    spent: &[SpentOutput],
) -> TransactionValidationResult<()> {
    let utxo_inputs = tx.inputs.iter().filter(|input| input.is_utxo()).count();
    if spent.len() != utxo_inputs {
        return Err(TransactionValidationError::SpentOutputsMismatch(
            utxo_inputs,
            spent.len(),
        ));
    }

    let mut total_in = Integer::ZERO;
    let mut spent_iter = spent.iter();
    for (i, input) in tx.inputs.iter().enumerate() {
        if let Some(deposit) = &input.deposit {
            total_in = total_in.checked_add(deposit.amount)?;
        } else if let Some(mint) = &input.mint {
            total_in = total_in.checked_add(mint.amount)?;
        } else if input.is_utxo() {
            let Some(utxo) = spent_iter.next() else {
                return Err(TransactionValidationError::SpentOutputsMismatch(
                    utxo_inputs,
                    spent.len(),
                ));
            };
            if utxo.asset != tx.asset {
                return Err(TransactionValidationError::AssetMismatch(i));
            }
            total_in = total_in.checked_add(utxo.amount)?;
        }
    }

    let mut total_out = Integer::ZERO;
    for output in &tx.outputs {
        total_out = total_out.checked_add(output.amount)?;
    }

    if total_in != total_out {
        return Err(TransactionValidationError::UnbalancedAmounts(
            total_in, total_out,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DepositData, Input, WithdrawalData};
    use assert_matches::assert_matches;
    use mixin_crypto_keys::public;
    use mixin_transaction_types::{constants::XIN_ASSET_ID, ScriptError};
    use rand::{rngs::StdRng, SeedableRng};

    fn point(rng: &mut StdRng) -> Key {
        public(&Key::random(rng)).unwrap()
    }

    fn script_output(rng: &mut StdRng, amount: &str, keys: usize, threshold: u8) -> Output {
        Output::new_script_output(
            amount.parse().unwrap(),
            (0..keys).map(|_| point(rng)).collect(),
            point(rng),
            Script::new_threshold(threshold),
        )
    }

    fn transfer(rng: &mut StdRng) -> Transaction {
        let mut tx = Transaction::new(5, XIN_ASSET_ID);
        tx.add_input(Hash::sha3_256(b"previous"), 0);
        tx.outputs.push(script_output(rng, "0.7", 1, 1));
        tx.outputs.push(script_output(rng, "0.3", 2, 2));
        tx
    }

    fn spent(amount: &str) -> SpentOutput {
        SpentOutput {
            asset: XIN_ASSET_ID,
            amount: amount.parse().unwrap(),
            keys: Vec::new(),
            script: Script::new_threshold(1),
        }
    }

    #[test]
    fn test_valid_transfer() {
        let mut rng = StdRng::seed_from_u64(1);
        let tx = transfer(&mut rng);
        assert_eq!(validate(&tx), Ok(()));
        assert_eq!(validate_spending(&tx, &[spent("1")]), Ok(()));
    }

    #[test]
    fn test_counts() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut tx = transfer(&mut rng);
        tx.inputs.clear();
        assert_matches!(validate(&tx), Err(TransactionValidationError::NoInputs));

        let mut tx = transfer(&mut rng);
        tx.outputs.clear();
        assert_matches!(validate(&tx), Err(TransactionValidationError::NoOutputs));

        let mut tx = transfer(&mut rng);
        for i in 1..=256u16 {
            tx.add_input(Hash::sha3_256(&i.to_be_bytes()), 0);
        }
        assert_matches!(
            validate(&tx),
            Err(TransactionValidationError::TooManyInputs(257))
        );
    }

    #[test]
    fn test_references() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut tx = transfer(&mut rng);
        tx.references = vec![Hash::sha3_256(b"a"), Hash::sha3_256(b"b")];
        assert_eq!(validate(&tx), Ok(()));

        tx.references.push(Hash::sha3_256(b"c"));
        assert_matches!(
            validate(&tx),
            Err(TransactionValidationError::TooManyReferences(3))
        );

        tx.references.truncate(1);
        tx.version = 3;
        assert_matches!(
            validate(&tx),
            Err(TransactionValidationError::ReferencesNotSupported(3))
        );
    }

    #[test]
    fn test_extra_limit() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut tx = transfer(&mut rng);
        // 0.7 XIN to one key at threshold 1 buys 700 KiB.
        tx.extra = vec![0u8; 700 * 1024].into();
        assert_eq!(validate(&tx), Ok(()));
        tx.extra = vec![0u8; 700 * 1024 + 1].into();
        assert_matches!(
            validate(&tx),
            Err(TransactionValidationError::ExtraTooLarge(_, 716800))
        );

        tx.outputs.swap(0, 1);
        tx.extra = vec![0u8; 257].into();
        assert_matches!(
            validate(&tx),
            Err(TransactionValidationError::ExtraTooLarge(257, 256))
        );
    }

    #[test]
    fn test_input_shapes() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut tx = transfer(&mut rng);
        tx.add_input(Hash::sha3_256(b"previous"), 0);
        assert_matches!(
            validate(&tx),
            Err(TransactionValidationError::DuplicateInput(_, 0))
        );

        let mut tx = transfer(&mut rng);
        tx.inputs[0].genesis = vec![1];
        assert_matches!(
            validate(&tx),
            Err(TransactionValidationError::InvalidInputShape(0))
        );

        let mut tx = transfer(&mut rng);
        tx.inputs = vec![Input::deposit(DepositData {
            chain: Hash::sha3_256(b"chain"),
            asset_key: "key".to_string(),
            transaction: "tx".to_string(),
            index: 0,
            amount: Integer::from_whole(1),
        })];
        assert_eq!(validate(&tx), Ok(()));
        assert_eq!(validate_spending(&tx, &[]), Ok(()));
    }

    #[test]
    fn test_outputs() {
        let mut rng = StdRng::seed_from_u64(6);

        let mut tx = transfer(&mut rng);
        tx.outputs[1].script = Script::new_threshold(3);
        assert_matches!(
            validate(&tx),
            Err(TransactionValidationError::InvalidScript(
                1,
                ScriptError::NotEnoughKeys(3, 2)
            ))
        );

        let mut tx = transfer(&mut rng);
        tx.outputs[0].amount = Integer::ZERO;
        assert_matches!(
            validate(&tx),
            Err(TransactionValidationError::NonPositiveAmount(0))
        );

        let mut tx = transfer(&mut rng);
        let bad = (2u8..=255).find(|y| {
            let mut k = [0u8; 32];
            k[0] = *y;
            !Key(k).is_valid_point()
        });
        if let Some(y) = bad {
            let mut k = [0u8; 32];
            k[0] = y;
            tx.outputs[0].keys[0] = Key(k);
            assert_matches!(
                validate(&tx),
                Err(TransactionValidationError::InvalidOutputKey(0))
            );
        }

        let mut tx = transfer(&mut rng);
        tx.outputs[0].withdrawal = Some(WithdrawalData::default());
        assert_matches!(
            validate(&tx),
            Err(TransactionValidationError::InvalidWithdrawal(0))
        );
    }

    #[test]
    fn test_spending() {
        let mut rng = StdRng::seed_from_u64(7);
        let tx = transfer(&mut rng);

        assert_matches!(
            validate_spending(&tx, &[spent("1.1")]),
            Err(TransactionValidationError::UnbalancedAmounts(_, _))
        );
        assert_matches!(
            validate_spending(&tx, &[]),
            Err(TransactionValidationError::SpentOutputsMismatch(1, 0))
        );

        let mut other = spent("1");
        other.asset = Hash::sha3_256(b"other asset");
        assert_matches!(
            validate_spending(&tx, &[other]),
            Err(TransactionValidationError::AssetMismatch(0))
        );
    }
}
