// Copyright (c) 2024 Botho Foundation

use crate::{
    AggregatedSignature, EncodeError, Input, Output, Transaction, TxSignatures,
};
use mixin_transaction_types::{
    constants::{
        AGGREGATED_SIGNATURE_MARKER, AGGREGATED_SIGNATURE_ORDINARY_MASK,
        AGGREGATED_SIGNATURE_PREFIX, AGGREGATED_SIGNATURE_SPARSE_MASK, MAGIC_PREFIX, NULL_PREFIX,
        TX_VERSION_HASH_SIGNATURE, TX_VERSION_REFERENCES,
    },
    Integer,
};

/// Big-endian writer for the versioned transaction layout.
pub(crate) struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(1024),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// A count or length in two bytes.
    pub fn write_int(&mut self, field: &'static str, n: usize) -> Result<(), EncodeError> {
        let v = u16::try_from(n).map_err(|_| EncodeError::TooLong(field, n))?;
        self.write_u16(v);
        Ok(())
    }

    /// Two-byte length then the bytes.
    pub fn write_bytes(&mut self, field: &'static str, bytes: &[u8]) -> Result<(), EncodeError> {
        self.write_int(field, bytes.len())?;
        self.write(bytes);
        Ok(())
    }

    pub fn write_integer(&mut self, amount: &Integer) -> Result<(), EncodeError> {
        self.write_bytes("amount", &amount.to_be_bytes())
    }

    /// Magic prefix for a present optional field, null prefix otherwise.
    fn write_presence(&mut self, present: bool) {
        if present {
            self.write(&MAGIC_PREFIX);
        } else {
            self.write(&NULL_PREFIX);
        }
    }

    pub fn encode_transaction(&mut self, tx: &Transaction) -> Result<(), EncodeError> {
        self.write(&MAGIC_PREFIX);
        self.write(&[0x00, tx.version]);
        self.write(tx.asset.as_bytes());

        self.write_int("inputs", tx.inputs.len())?;
        for input in &tx.inputs {
            self.encode_input(input)?;
        }

        self.write_int("outputs", tx.outputs.len())?;
        for output in &tx.outputs {
            self.encode_output(output, tx.version)?;
        }

        if tx.version >= TX_VERSION_REFERENCES {
            self.write_int("references", tx.references.len())?;
            for r in &tx.references {
                self.write(r.as_bytes());
            }
        }

        if tx.version >= TX_VERSION_REFERENCES {
            let len = u32::try_from(tx.extra.len())
                .map_err(|_| EncodeError::TooLong("extra", tx.extra.len()))?;
            self.write_u32(len);
            self.write(tx.extra.as_bytes());
        } else {
            self.write_bytes("extra", tx.extra.as_bytes())?;
        }

        match &tx.signatures {
            TxSignatures::Aggregated(agg) => self.encode_aggregated_signature(agg),
            TxSignatures::Map(groups) => {
                // A group count of 0xFFFF would read back as the aggregated
                // signature prefix.
                if groups.len() >= AGGREGATED_SIGNATURE_PREFIX as usize {
                    return Err(EncodeError::TooLong("signatures", groups.len()));
                }
                self.write_int("signatures", groups.len())?;
                for group in groups {
                    self.write_int("signers", group.len())?;
                    for (signer, sig) in group {
                        self.write_u16(*signer);
                        self.write(sig.as_bytes());
                    }
                }
                Ok(())
            }
        }
    }

    fn encode_input(&mut self, input: &Input) -> Result<(), EncodeError> {
        self.write(input.hash.as_bytes());
        self.write_u16(input.index as u16);
        self.write_bytes("genesis", &input.genesis)?;

        self.write_presence(input.deposit.is_some());
        if let Some(d) = &input.deposit {
            self.write(d.chain.as_bytes());
            self.write_bytes("asset_key", d.asset_key.as_bytes())?;
            self.write_bytes("transaction", d.transaction.as_bytes())?;
            self.write_u64(d.index);
            self.write_integer(&d.amount)?;
        }

        self.write_presence(input.mint.is_some());
        if let Some(m) = &input.mint {
            self.write_bytes("group", m.group.as_bytes())?;
            self.write_u64(m.batch);
            self.write_integer(&m.amount)?;
        }
        Ok(())
    }

    fn encode_output(&mut self, output: &Output, version: u8) -> Result<(), EncodeError> {
        self.write(&[0x00, u8::from(output.output_type)]);
        self.write_integer(&output.amount)?;

        self.write_int("keys", output.keys.len())?;
        for k in &output.keys {
            self.write(k.as_bytes());
        }
        self.write(output.mask.as_bytes());
        self.write_bytes("script", output.script.as_bytes())?;

        self.write_presence(output.withdrawal.is_some());
        if let Some(w) = &output.withdrawal {
            if version < TX_VERSION_HASH_SIGNATURE {
                self.write(w.chain.as_bytes());
                self.write_bytes("asset_key", w.asset_key.as_bytes())?;
            }
            self.write_bytes("address", w.address.as_bytes())?;
            self.write_bytes("tag", w.tag.as_bytes())?;
        }
        Ok(())
    }

    fn encode_aggregated_signature(&mut self, agg: &AggregatedSignature) -> Result<(), EncodeError> {
        self.write_u16(AGGREGATED_SIGNATURE_PREFIX);
        self.write_u16(AGGREGATED_SIGNATURE_MARKER);
        self.write(agg.signature.as_bytes());

        if agg.uses_sparse_layout() {
            self.write_u8(AGGREGATED_SIGNATURE_SPARSE_MASK);
            self.write_int("signers", agg.signers().len())?;
            for m in agg.signers() {
                self.write_u16(*m);
            }
        } else {
            self.write_u8(AGGREGATED_SIGNATURE_ORDINARY_MASK);
            self.write_bytes("signers", &agg.bitmap())?;
        }
        Ok(())
    }
}
