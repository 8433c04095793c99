// Copyright (c) 2024 Botho Foundation

use crate::{
    AggregatedSignature, DecodeError, DepositData, Input, MintData, Output, Transaction,
    TransactionExtra, TxSignatures, WithdrawalData,
};
use mixin_crypto_keys::{Hash, Key, Signature};
use mixin_transaction_types::{
    constants::{
        AGGREGATED_SIGNATURE_MARKER, AGGREGATED_SIGNATURE_ORDINARY_MASK,
        AGGREGATED_SIGNATURE_PREFIX, AGGREGATED_SIGNATURE_SPARSE_MASK,
        EXTRA_STORAGE_CAPACITY_LIMIT, MAGIC_PREFIX, NULL_PREFIX, TX_VERSION_HASH_SIGNATURE,
        TX_VERSION_REFERENCES,
    },
    Integer, OutputType, Script,
};
use std::collections::BTreeMap;

/// Largest bitmap that still only names signers in `0..=u16::MAX`.
const MAX_SIGNER_BITMAP_LEN: usize = (u16::MAX as usize) / 8 + 1;

/// Fewest bytes an encoded input can take.
const MIN_INPUT_LEN: usize = 32 + 2 + 2 + 2 + 2;
/// Fewest bytes an encoded output can take.
const MIN_OUTPUT_LEN: usize = 2 + 2 + 2 + 32 + 2 + 2;
/// Fewest bytes of a signature group: its entry count.
const MIN_SIGNATURE_GROUP_LEN: usize = 2;

/// Big-endian reader for the versioned transaction layout.
pub(crate) struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Capacity to reserve for `count` elements of at least `min_len`
    /// bytes each, bounded by what is left to read.
    fn capacity(&self, count: usize, min_len: usize) -> usize {
        count.min(self.remaining() / min_len)
    }

    fn read(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::UnexpectedEof(n - self.remaining()));
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }

    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_array::<1>()?[0])
    }

    fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    fn read_u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    fn read_int(&mut self) -> Result<usize, DecodeError> {
        Ok(self.read_u16()? as usize)
    }

    fn read_hash(&mut self) -> Result<Hash, DecodeError> {
        Ok(Hash(self.read_array()?))
    }

    fn read_key(&mut self) -> Result<Key, DecodeError> {
        Ok(Key(self.read_array()?))
    }

    fn read_signature(&mut self) -> Result<Signature, DecodeError> {
        Ok(Signature(self.read_array()?))
    }

    fn read_bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        let n = self.read_int()?;
        self.read(n)
    }

    fn read_string(&mut self) -> Result<String, DecodeError> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidString)
    }

    fn read_integer(&mut self) -> Result<Integer, DecodeError> {
        Ok(Integer::from_be_bytes(self.read_bytes()?)?)
    }

    /// `true` after a magic prefix, `false` after a null prefix.
    fn read_presence(&mut self) -> Result<bool, DecodeError> {
        let prefix: [u8; 2] = self.read_array()?;
        if prefix == MAGIC_PREFIX {
            Ok(true)
        } else if prefix == NULL_PREFIX {
            Ok(false)
        } else {
            Err(DecodeError::InvalidPrefix(u16::from_be_bytes(prefix)))
        }
    }

    pub fn decode_transaction(mut self) -> Result<Transaction, DecodeError> {
        let magic: [u8; 2] = self.read_array()?;
        if magic != MAGIC_PREFIX {
            return Err(DecodeError::InvalidPrefix(u16::from_be_bytes(magic)));
        }
        let header: [u8; 2] = self.read_array()?;
        if header[0] != 0x00 {
            return Err(DecodeError::InvalidPrefix(u16::from_be_bytes(header)));
        }
        let version = header[1];
        let asset = self.read_hash()?;

        let count = self.read_int()?;
        let mut inputs = Vec::with_capacity(self.capacity(count, MIN_INPUT_LEN));
        for _ in 0..count {
            inputs.push(self.decode_input()?);
        }

        let count = self.read_int()?;
        let mut outputs = Vec::with_capacity(self.capacity(count, MIN_OUTPUT_LEN));
        for _ in 0..count {
            outputs.push(self.decode_output(version)?);
        }

        let mut references = Vec::new();
        if version >= TX_VERSION_REFERENCES {
            let count = self.read_int()?;
            for _ in 0..count {
                references.push(self.read_hash()?);
            }
        }

        let extra_len = if version >= TX_VERSION_REFERENCES {
            self.read_u32()? as usize
        } else {
            self.read_int()?
        };
        if extra_len > EXTRA_STORAGE_CAPACITY_LIMIT {
            return Err(DecodeError::ExtraTooLarge(extra_len));
        }
        let extra = TransactionExtra(self.read(extra_len)?.to_vec());

        let signatures = self.decode_signatures()?;

        if self.remaining() > 0 {
            return Err(DecodeError::TrailingBytes(self.remaining()));
        }

        Ok(Transaction {
            version,
            asset,
            inputs,
            outputs,
            references,
            extra,
            signatures,
        })
    }

    fn decode_input(&mut self) -> Result<Input, DecodeError> {
        let hash = self.read_hash()?;
        let index = self.read_u16()?;
        let index = u8::try_from(index).map_err(|_| DecodeError::InvalidInputIndex(index as u64))?;
        let genesis = self.read_bytes()?.to_vec();

        let deposit = if self.read_presence()? {
            Some(DepositData {
                chain: self.read_hash()?,
                asset_key: self.read_string()?,
                transaction: self.read_string()?,
                index: self.read_u64()?,
                amount: self.read_integer()?,
            })
        } else {
            None
        };

        let mint = if self.read_presence()? {
            Some(MintData {
                group: self.read_string()?,
                batch: self.read_u64()?,
                amount: self.read_integer()?,
            })
        } else {
            None
        };

        Ok(Input {
            hash,
            index,
            genesis,
            deposit,
            mint,
        })
    }

    fn decode_output(&mut self, version: u8) -> Result<Output, DecodeError> {
        let kind: [u8; 2] = self.read_array()?;
        if kind[0] != 0x00 {
            return Err(DecodeError::InvalidPrefix(u16::from_be_bytes(kind)));
        }
        let output_type =
            OutputType::try_from(kind[1]).map_err(|e| DecodeError::UnknownOutputType(e.0))?;
        let amount = self.read_integer()?;

        let count = self.read_int()?;
        let mut keys = Vec::with_capacity(self.capacity(count, 32));
        for _ in 0..count {
            keys.push(self.read_key()?);
        }
        let mask = self.read_key()?;
        let script = Script::from_bytes(self.read_bytes()?.to_vec());

        let withdrawal = if self.read_presence()? {
            let (chain, asset_key) = if version < TX_VERSION_HASH_SIGNATURE {
                (self.read_hash()?, self.read_string()?)
            } else {
                (Hash::default(), String::new())
            };
            Some(WithdrawalData {
                chain,
                asset_key,
                address: self.read_string()?,
                tag: self.read_string()?,
            })
        } else {
            None
        };

        Ok(Output {
            output_type,
            amount,
            keys,
            mask,
            script,
            withdrawal,
        })
    }

    fn decode_signatures(&mut self) -> Result<TxSignatures, DecodeError> {
        let prefix = self.read_u16()?;
        if prefix == AGGREGATED_SIGNATURE_PREFIX {
            return self.decode_aggregated_signature().map(TxSignatures::Aggregated);
        }

        let mut groups =
            Vec::with_capacity(self.capacity(prefix as usize, MIN_SIGNATURE_GROUP_LEN));
        for _ in 0..prefix {
            let count = self.read_int()?;
            let mut group = BTreeMap::new();
            let mut last: Option<u16> = None;
            for _ in 0..count {
                let signer = self.read_u16()?;
                if last.is_some_and(|l| signer <= l) {
                    return Err(DecodeError::UnorderedSigners);
                }
                last = Some(signer);
                group.insert(signer, self.read_signature()?);
            }
            groups.push(group);
        }
        Ok(TxSignatures::Map(groups))
    }

    fn decode_aggregated_signature(&mut self) -> Result<AggregatedSignature, DecodeError> {
        let marker = self.read_u16()?;
        if marker != AGGREGATED_SIGNATURE_MARKER {
            return Err(DecodeError::InvalidSignatureMarker(marker));
        }
        let signature = self.read_signature()?;

        let mode = self.read_u8()?;
        let signers = match mode {
            AGGREGATED_SIGNATURE_SPARSE_MASK => {
                let count = self.read_int()?;
                let mut signers = Vec::with_capacity(self.capacity(count, 2));
                for _ in 0..count {
                    let m = self.read_u16()?;
                    if signers.last().is_some_and(|l| m <= *l) {
                        return Err(DecodeError::UnorderedSigners);
                    }
                    signers.push(m);
                }
                signers
            }
            AGGREGATED_SIGNATURE_ORDINARY_MASK => {
                let bitmap = self.read_bytes()?;
                if bitmap.len() > MAX_SIGNER_BITMAP_LEN {
                    return Err(DecodeError::InvalidLength(
                        bitmap.len(),
                        MAX_SIGNER_BITMAP_LEN,
                    ));
                }
                if bitmap.last() == Some(&0) {
                    return Err(DecodeError::NonMinimalBitmap);
                }
                AggregatedSignature::signers_from_bitmap(bitmap)
            }
            other => return Err(DecodeError::InvalidSignerMode(other)),
        };

        let agg = AggregatedSignature::new(signature, signers);
        if agg.uses_sparse_layout() != (mode == AGGREGATED_SIGNATURE_SPARSE_MASK) {
            return Err(DecodeError::InvalidSignerMode(mode));
        }
        Ok(agg)
    }
}
