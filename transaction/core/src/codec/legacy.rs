// Copyright (c) 2024 Botho Foundation

//! Msgpack layout of version 0 and 1 transactions.
//!
//! Fields are named maps in PascalCase. Signatures are a list per input
//! with no signer indices; decoding assigns indices `0..n` in list order and
//! encoding requires exactly that shape.

use crate::{
    DecodeError, DepositData, EncodeError, Input, MintData, Output, Transaction,
    TransactionExtra, TxSignatures, WithdrawalData,
};
use mixin_crypto_keys::{Hash, Key, Signature};
use mixin_transaction_types::{constants::TX_VERSION_COMMON_ENCODING, Integer, OutputType, Script};
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;
use std::{collections::BTreeMap, io::Cursor};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
struct LegacyTransaction {
    version: u8,
    asset: ByteBuf,
    inputs: Vec<LegacyInput>,
    outputs: Vec<LegacyOutput>,
    extra: ByteBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signatures: Option<Vec<Vec<ByteBuf>>>,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
struct LegacyInput {
    hash: ByteBuf,
    index: u64,
    genesis: ByteBuf,
    deposit: Option<LegacyDeposit>,
    mint: Option<LegacyMint>,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
struct LegacyDeposit {
    chain: ByteBuf,
    asset_key: String,
    transaction_hash: String,
    output_index: u64,
    amount: ByteBuf,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
struct LegacyMint {
    group: String,
    batch: u64,
    amount: ByteBuf,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
struct LegacyOutput {
    #[serde(rename = "Type")]
    output_type: u8,
    amount: ByteBuf,
    keys: Vec<ByteBuf>,
    script: ByteBuf,
    mask: ByteBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    withdrawal: Option<LegacyWithdrawal>,
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
struct LegacyWithdrawal {
    chain: ByteBuf,
    asset_key: String,
    address: String,
    tag: String,
}

fn buf(bytes: &[u8]) -> ByteBuf {
    ByteBuf::from(bytes.to_vec())
}

fn fixed<const N: usize>(bytes: &ByteBuf) -> Result<[u8; N], DecodeError> {
    <[u8; N]>::try_from(bytes.as_slice())
        .map_err(|_| DecodeError::InvalidLength(bytes.len(), N))
}

/// Encode `tx` as msgpack, with or without its signatures.
pub(crate) fn encode(tx: &Transaction, with_signatures: bool) -> Result<Vec<u8>, EncodeError> {
    if tx.version >= TX_VERSION_COMMON_ENCODING {
        return Err(EncodeError::UnsupportedVersion(tx.version));
    }

    let signatures = if with_signatures {
        match &tx.signatures {
            TxSignatures::Aggregated(_) => return Err(EncodeError::LegacyAggregatedSignature),
            TxSignatures::Map(groups) => Some(
                groups
                    .iter()
                    .map(|group| {
                        if group.keys().copied().ne(0..group.len() as u16) {
                            return Err(EncodeError::LegacySignerIndices);
                        }
                        Ok(group.values().map(|s| buf(s.as_bytes())).collect::<Vec<_>>())
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        }
    } else {
        None
    };

    let legacy = LegacyTransaction {
        version: tx.version,
        asset: buf(tx.asset.as_bytes()),
        inputs: tx
            .inputs
            .iter()
            .map(|input| LegacyInput {
                hash: buf(input.hash.as_bytes()),
                index: input.index as u64,
                genesis: buf(&input.genesis),
                deposit: input.deposit.as_ref().map(|d| LegacyDeposit {
                    chain: buf(d.chain.as_bytes()),
                    asset_key: d.asset_key.clone(),
                    transaction_hash: d.transaction.clone(),
                    output_index: d.index,
                    amount: ByteBuf::from(d.amount.to_be_bytes()),
                }),
                mint: input.mint.as_ref().map(|m| LegacyMint {
                    group: m.group.clone(),
                    batch: m.batch,
                    amount: ByteBuf::from(m.amount.to_be_bytes()),
                }),
            })
            .collect(),
        outputs: tx
            .outputs
            .iter()
            .map(|output| LegacyOutput {
                output_type: output.output_type.into(),
                amount: ByteBuf::from(output.amount.to_be_bytes()),
                keys: output.keys.iter().map(|k| buf(k.as_bytes())).collect(),
                script: buf(output.script.as_bytes()),
                mask: buf(output.mask.as_bytes()),
                withdrawal: output.withdrawal.as_ref().map(|w| LegacyWithdrawal {
                    chain: buf(w.chain.as_bytes()),
                    asset_key: w.asset_key.clone(),
                    address: w.address.clone(),
                    tag: w.tag.clone(),
                }),
            })
            .collect(),
        extra: buf(tx.extra.as_bytes()),
        signatures,
    };

    Ok(rmp_serde::to_vec_named(&legacy)?)
}

/// Decode a msgpack transaction. The whole input must be consumed.
pub(crate) fn decode(bytes: &[u8]) -> Result<Transaction, DecodeError> {
    let mut cursor = Cursor::new(bytes);
    let legacy = {
        let mut de = rmp_serde::Deserializer::new(&mut cursor);
        LegacyTransaction::deserialize(&mut de)?
    };
    let consumed = cursor.position() as usize;
    if consumed < bytes.len() {
        return Err(DecodeError::TrailingBytes(bytes.len() - consumed));
    }

    if legacy.version >= TX_VERSION_COMMON_ENCODING {
        return Err(DecodeError::UnsupportedVersion(legacy.version));
    }

    let inputs = legacy
        .inputs
        .iter()
        .map(|input| -> Result<Input, DecodeError> {
            let index = u8::try_from(input.index)
                .map_err(|_| DecodeError::InvalidInputIndex(input.index))?;
            let deposit = match &input.deposit {
                Some(d) => Some(DepositData {
                    chain: Hash(fixed(&d.chain)?),
                    asset_key: d.asset_key.clone(),
                    transaction: d.transaction_hash.clone(),
                    index: d.output_index,
                    amount: Integer::from_be_bytes(&d.amount)?,
                }),
                None => None,
            };
            let mint = match &input.mint {
                Some(m) => Some(MintData {
                    group: m.group.clone(),
                    batch: m.batch,
                    amount: Integer::from_be_bytes(&m.amount)?,
                }),
                None => None,
            };
            Ok(Input {
                hash: Hash(fixed(&input.hash)?),
                index,
                genesis: input.genesis.to_vec(),
                deposit,
                mint,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let outputs = legacy
        .outputs
        .iter()
        .map(|output| -> Result<Output, DecodeError> {
            let withdrawal = match &output.withdrawal {
                Some(w) => Some(WithdrawalData {
                    chain: Hash(fixed(&w.chain)?),
                    asset_key: w.asset_key.clone(),
                    address: w.address.clone(),
                    tag: w.tag.clone(),
                }),
                None => None,
            };
            Ok(Output {
                output_type: OutputType::try_from(output.output_type)
                    .map_err(|e| DecodeError::UnknownOutputType(e.0))?,
                amount: Integer::from_be_bytes(&output.amount)?,
                keys: output
                    .keys
                    .iter()
                    .map(|k| fixed(k).map(Key))
                    .collect::<Result<Vec<_>, _>>()?,
                mask: Key(fixed(&output.mask)?),
                script: Script::from_bytes(output.script.to_vec()),
                withdrawal,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let groups = legacy
        .signatures
        .unwrap_or_default()
        .iter()
        .map(|list| -> Result<BTreeMap<u16, Signature>, DecodeError> {
            list.iter()
                .enumerate()
                .map(|(i, sig)| fixed(sig).map(|bytes| (i as u16, Signature(bytes))))
                .collect()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Transaction {
        version: legacy.version,
        asset: Hash(fixed(&legacy.asset)?),
        inputs,
        outputs,
        references: Vec::new(),
        extra: TransactionExtra(legacy.extra.into_vec()),
        signatures: TxSignatures::Map(groups),
    })
}
