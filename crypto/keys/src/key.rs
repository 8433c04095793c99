// Copyright (c) 2024 Botho Foundation

use crate::{
    ops::{deterministic_view_key, public, reduce_uniform, seed_to_scalar},
    Hash, KeyError, Signature,
};
use curve25519_dalek::{
    edwards::{CompressedEdwardsY, EdwardsPoint},
    scalar::Scalar,
};
use rand_core::{CryptoRng, RngCore};
use std::str::FromStr;
use zeroize::Zeroize;

/// 32 bytes holding either a canonical ed25519 scalar or a compressed
/// Edwards point.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Key(pub [u8; 32]);

impl_hex_bytes!(Key, 32);

impl Key {
    /// Parse a key from hex.
    ///
    /// 32 bytes are taken as-is. 64 bytes are an ed25519 private key
    /// (`seed || public`): the seed half goes through the clamped seed path
    /// and the result is the signing scalar, not the raw bytes.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let raw = hex::decode(s)?;
        match raw.len() {
            32 => Self::try_from(&raw[..]),
            64 => {
                let mut seed = [0u8; 32];
                seed.copy_from_slice(&raw[..32]);
                let key = Self::from_ed25519_seed(&seed);
                seed.zeroize();
                Ok(key)
            }
            n => Err(KeyError::LengthMismatch(32, n)),
        }
    }

    /// Scalar key from 64 uniform bytes.
    pub fn from_seed64(seed: &[u8; 64]) -> Self {
        Self::from_scalar(&reduce_uniform(seed))
    }

    /// Scalar key from a 32-byte ed25519 seed.
    pub fn from_ed25519_seed(seed: &[u8; 32]) -> Self {
        Self::from_scalar(&seed_to_scalar(seed))
    }

    /// A fresh scalar key drawn from `rng`.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut seed = [0u8; 64];
        rng.fill_bytes(&mut seed);
        let key = Self::from_seed64(&seed);
        seed.zeroize();
        key
    }

    pub fn from_scalar(s: &Scalar) -> Self {
        Self(s.to_bytes())
    }

    pub fn from_point(p: &EdwardsPoint) -> Self {
        Self(p.compress().to_bytes())
    }

    /// Read as a canonical scalar.
    pub fn as_scalar(&self) -> Result<Scalar, KeyError> {
        Option::<Scalar>::from(Scalar::from_canonical_bytes(self.0))
            .ok_or(KeyError::NonCanonicalScalar)
    }

    /// Read as a compressed point.
    pub fn as_point(&self) -> Result<EdwardsPoint, KeyError> {
        CompressedEdwardsY(self.0)
            .decompress()
            .ok_or(KeyError::InvalidPoint)
    }

    pub fn is_valid_point(&self) -> bool {
        self.as_point().is_ok()
    }

    /// The public key of this scalar key.
    pub fn public_key(&self) -> Result<Key, KeyError> {
        public(self)
    }

    /// A second scalar derived from this key's bytes, used to turn a public
    /// spend key into its view key.
    pub fn deterministic_hash_derive(&self) -> Key {
        deterministic_view_key(self)
    }

    pub fn sign(&self, message: &[u8]) -> Result<Signature, KeyError> {
        crate::sign(self, message)
    }

    pub fn sign_hash(&self, hash: &Hash) -> Result<Signature, KeyError> {
        crate::sign_hash(self, hash)
    }

    /// Verify `sig` over `message` with this key read as a public point.
    pub fn verify(&self, message: &[u8], sig: &Signature) -> bool {
        crate::verify(self, message, sig)
    }
}

impl FromStr for Key {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Zeroize for Key {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
