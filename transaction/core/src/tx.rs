// Copyright (c) 2024 Botho Foundation

//! The kernel transaction model.
//!
//! One record covers every version. The version byte decides the wire
//! family (legacy msgpack below 2, big-endian binary from 2), the hash
//! function (SHA3-256 below 3, BLAKE3 from 3), whether references exist
//! (from 4) and the withdrawal layout (chain and asset key dropped from 5).

use crate::{
    codec::{self, legacy},
    AggregatedSignature, DecodeError, EncodeError, TransactionExtra,
};
use mixin_crypto_keys::{Hash, Key, Signature};
use mixin_transaction_types::{
    constants::{
        EXTRA_SIZE_GENERAL_LIMIT, EXTRA_SIZE_STORAGE_STEP, EXTRA_STORAGE_CAPACITY_LIMIT,
        EXTRA_STORAGE_PRICE_STEP_UNITS, TX_VERSION_BLAKE3_HASH, TX_VERSION_COMMON_ENCODING,
        TX_VERSION_LATEST, TX_VERSION_REFERENCES, XIN_ASSET_ID,
    },
    Integer, OutputType, Script,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A deposit observed on an external chain.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct DepositData {
    pub chain: Hash,
    pub asset_key: String,
    pub transaction: String,
    pub index: u64,
    pub amount: Integer,
}

/// Newly minted supply.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct MintData {
    pub group: String,
    pub batch: u64,
    pub amount: Integer,
}

/// A transaction input.
///
/// Exactly one shape is meaningful per input: a UTXO reference
/// (`hash`, `index`), a non-empty `genesis`, a `deposit` or a `mint`.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Input {
    pub hash: Hash,
    pub index: u8,
    #[serde(default, with = "hex_bytes")]
    pub genesis: Vec<u8>,
    #[serde(default)]
    pub deposit: Option<DepositData>,
    #[serde(default)]
    pub mint: Option<MintData>,
}

impl Input {
    /// Spend output `index` of transaction `hash`.
    pub fn utxo(hash: Hash, index: u8) -> Self {
        Self {
            hash,
            index,
            ..Default::default()
        }
    }

    pub fn genesis(genesis: Vec<u8>) -> Self {
        Self {
            genesis,
            ..Default::default()
        }
    }

    pub fn deposit(deposit: DepositData) -> Self {
        Self {
            deposit: Some(deposit),
            ..Default::default()
        }
    }

    pub fn mint(mint: MintData) -> Self {
        Self {
            mint: Some(mint),
            ..Default::default()
        }
    }

    /// Whether this input spends an existing output.
    pub fn is_utxo(&self) -> bool {
        self.genesis.is_empty() && self.deposit.is_none() && self.mint.is_none()
    }
}

/// Destination of a withdrawal output.
///
/// `chain` and `asset_key` are only written for versions below 5.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct WithdrawalData {
    #[serde(default)]
    pub chain: Hash,
    #[serde(default)]
    pub asset_key: String,
    pub address: String,
    #[serde(default)]
    pub tag: String,
}

/// A transaction output.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Output {
    #[serde(rename = "type")]
    pub output_type: OutputType,
    pub amount: Integer,
    pub keys: Vec<Key>,
    pub mask: Key,
    pub script: Script,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withdrawal: Option<WithdrawalData>,
}

impl Output {
    /// A standard output locked by `keys` under `script`.
    pub fn new_script_output(amount: Integer, keys: Vec<Key>, mask: Key, script: Script) -> Self {
        Self {
            output_type: OutputType::Script,
            amount,
            keys,
            mask,
            script,
            withdrawal: None,
        }
    }

    /// A withdrawal submission to an external address.
    pub fn withdrawal(amount: Integer, withdrawal: WithdrawalData) -> Self {
        Self {
            output_type: OutputType::WithdrawalSubmit,
            amount,
            keys: Vec::new(),
            mask: Key::default(),
            script: Script::default(),
            withdrawal: Some(withdrawal),
        }
    }
}

/// Per-input signatures keyed by signer index, or one aggregated signature.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TxSignatures {
    Map(Vec<BTreeMap<u16, Signature>>),
    Aggregated(AggregatedSignature),
}

impl Default for TxSignatures {
    fn default() -> Self {
        TxSignatures::Map(Vec::new())
    }
}

impl TxSignatures {
    /// True when nothing is signed yet.
    pub fn is_empty(&self) -> bool {
        match self {
            TxSignatures::Map(groups) => groups.iter().all(BTreeMap::is_empty),
            TxSignatures::Aggregated(_) => false,
        }
    }
}

/// A kernel transaction of any version.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Transaction {
    pub version: u8,
    pub asset: Hash,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    #[serde(default)]
    pub references: Vec<Hash>,
    #[serde(default)]
    pub extra: TransactionExtra,
    #[serde(default)]
    pub signatures: TxSignatures,
}

impl Transaction {
    pub fn new(version: u8, asset: Hash) -> Self {
        Self {
            version,
            asset,
            inputs: Vec::new(),
            outputs: Vec::new(),
            references: Vec::new(),
            extra: TransactionExtra::default(),
            signatures: TxSignatures::default(),
        }
    }

    /// An empty transaction at the latest version.
    pub fn new_latest(asset: Hash) -> Self {
        Self::new(TX_VERSION_LATEST, asset)
    }

    pub fn add_input(&mut self, hash: Hash, index: u8) {
        self.inputs.push(Input::utxo(hash, index));
    }

    pub fn add_deposit_input(&mut self, deposit: DepositData) {
        self.inputs.push(Input::deposit(deposit));
    }

    pub fn add_mint_input(&mut self, mint: MintData) {
        self.inputs.push(Input::mint(mint));
    }

    /// Append an output of any type.
    pub fn add_output_with_type(
        &mut self,
        output_type: OutputType,
        keys: Vec<Key>,
        mask: Key,
        script: Script,
        amount: Integer,
        withdrawal: Option<WithdrawalData>,
    ) {
        self.outputs.push(Output {
            output_type,
            amount,
            keys,
            mask,
            script,
            withdrawal,
        });
    }

    /// A copy with every signature removed.
    pub fn payload(&self) -> Transaction {
        Transaction {
            signatures: TxSignatures::default(),
            ..self.clone()
        }
    }

    /// Encode with signatures, in the family the version selects.
    pub fn marshal(&self) -> Result<Vec<u8>, EncodeError> {
        if self.version < TX_VERSION_COMMON_ENCODING {
            legacy::encode(self, true)
        } else {
            codec::encode(self)
        }
    }

    /// Encode without signatures. This is what the hash commits to.
    pub fn payload_marshal(&self) -> Result<Vec<u8>, EncodeError> {
        if self.version < TX_VERSION_COMMON_ENCODING {
            legacy::encode(self, false)
        } else {
            codec::encode(&self.payload())
        }
    }

    /// The transaction hash: SHA3-256 of the payload before version 3,
    /// BLAKE3 from version 3.
    pub fn payload_hash(&self) -> Result<Hash, EncodeError> {
        let payload = self.payload_marshal()?;
        Ok(if self.version < TX_VERSION_BLAKE3_HASH {
            Hash::sha3_256(&payload)
        } else {
            Hash::blake3_256(&payload)
        })
    }

    /// Decode either wire family.
    pub fn unmarshal(bytes: &[u8]) -> Result<Self, DecodeError> {
        match codec::versioned_header(bytes) {
            Some(version) => codec::decode(bytes, version),
            None => legacy::decode(bytes),
        }
    }

    /// Decode from hex.
    pub fn from_hex(s: &str) -> Result<Self, DecodeError> {
        let bytes = hex::decode(s).map_err(|_| DecodeError::InvalidHex)?;
        Self::unmarshal(&bytes)
    }

    /// Largest extra this transaction may carry.
    ///
    /// A XIN transaction from version 4 whose first output is a plain
    /// single-key threshold-1 script buys 1 KiB of extra per 0.001 XIN in
    /// that output, up to 4 MiB. Everything else gets 256 bytes.
    pub fn extra_limit(&self) -> usize {
        if self.version < TX_VERSION_REFERENCES || self.asset != XIN_ASSET_ID {
            return EXTRA_SIZE_GENERAL_LIMIT;
        }
        let Some(out) = self.outputs.first() else {
            return EXTRA_SIZE_GENERAL_LIMIT;
        };
        if out.output_type != OutputType::Script
            || out.keys.len() != 1
            || out.script != Script::new_threshold(1)
        {
            return EXTRA_SIZE_GENERAL_LIMIT;
        }

        let step = Integer::from_units(EXTRA_STORAGE_PRICE_STEP_UNITS);
        if out.amount < step {
            return EXTRA_SIZE_GENERAL_LIMIT;
        }
        let steps = out.amount.count(step);
        let limit = (steps as u128) * (EXTRA_SIZE_STORAGE_STEP as u128);
        limit.min(EXTRA_STORAGE_CAPACITY_LIMIT as u128) as usize
    }
}

/// Hex for byte vectors in JSON.
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixin_transaction_types::constants::EXTRA_STORAGE_CAPACITY_LIMIT;

    fn storage_tx(version: u8, amount: &str) -> Transaction {
        let mut tx = Transaction::new(version, XIN_ASSET_ID);
        tx.add_input(Hash::sha3_256(b"utxo"), 0);
        tx.outputs.push(Output::new_script_output(
            amount.parse().unwrap(),
            vec![Key::default()],
            Key::default(),
            Script::new_threshold(1),
        ));
        tx
    }

    #[test]
    fn test_extra_limit_storage_carveout() {
        assert_eq!(storage_tx(5, "0.001").extra_limit(), 1024);
        assert_eq!(storage_tx(4, "0.0029").extra_limit(), 2048);
        assert_eq!(storage_tx(5, "1").extra_limit(), 1000 * 1024);
        assert_eq!(
            storage_tx(5, "100").extra_limit(),
            EXTRA_STORAGE_CAPACITY_LIMIT
        );
    }

    #[test]
    fn test_extra_limit_general() {
        // Too little paid.
        assert_eq!(storage_tx(5, "0.0009").extra_limit(), 256);
        // Too old.
        assert_eq!(storage_tx(3, "1").extra_limit(), 256);

        // Not XIN.
        let mut tx = storage_tx(5, "1");
        tx.asset = Hash::sha3_256(b"other");
        assert_eq!(tx.extra_limit(), 256);

        // Threshold 2.
        let mut tx = storage_tx(5, "1");
        tx.outputs[0].script = Script::new_threshold(2);
        assert_eq!(tx.extra_limit(), 256);

        // Two keys.
        let mut tx = storage_tx(5, "1");
        tx.outputs[0].keys.push(Key::default());
        assert_eq!(tx.extra_limit(), 256);

        // Not a script output.
        let mut tx = storage_tx(5, "1");
        tx.outputs[0].output_type = OutputType::WithdrawalFuel;
        assert_eq!(tx.extra_limit(), 256);

        // No outputs.
        let tx = Transaction::new(5, XIN_ASSET_ID);
        assert_eq!(tx.extra_limit(), 256);
    }

    #[test]
    fn test_hash_family_by_version() {
        let v2 = storage_tx(2, "1");
        let payload = v2.payload_marshal().unwrap();
        assert_eq!(v2.payload_hash().unwrap(), Hash::sha3_256(&payload));

        let v3 = storage_tx(3, "1");
        let payload = v3.payload_marshal().unwrap();
        assert_eq!(v3.payload_hash().unwrap(), Hash::blake3_256(&payload));

        let v1 = storage_tx(1, "1");
        let payload = v1.payload_marshal().unwrap();
        assert_eq!(v1.payload_hash().unwrap(), Hash::sha3_256(&payload));
    }

    #[test]
    fn test_hash_ignores_signatures() {
        let mut tx = storage_tx(5, "1");
        let unsigned = tx.payload_hash().unwrap();
        let mut group = BTreeMap::new();
        group.insert(0u16, Signature([7u8; 64]));
        tx.signatures = TxSignatures::Map(vec![group]);
        assert_eq!(tx.payload_hash().unwrap(), unsigned);
        assert_ne!(tx.marshal().unwrap(), tx.payload_marshal().unwrap());
    }

    #[test]
    fn test_input_shapes() {
        assert!(Input::utxo(Hash::default(), 1).is_utxo());
        assert!(!Input::genesis(vec![1]).is_utxo());
        let mint = Input::mint(MintData {
            group: "UNIVERSAL".to_string(),
            batch: 1,
            amount: Integer::from_whole(1),
        });
        assert!(!mint.is_utxo());
    }

    #[test]
    fn test_json_shape() {
        let tx = storage_tx(5, "1");
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["version"], 5);
        assert_eq!(json["outputs"][0]["amount"], "1.00000000");
        assert_eq!(json["outputs"][0]["script"], "fffe01");
        assert_eq!(json["inputs"][0]["genesis"], "");
        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, tx);
    }
}
