// Copyright (c) 2024 Botho Foundation

use crate::{hash_scalar, HashFamily};
use curve25519_dalek::edwards::EdwardsPoint;
use mixin_crypto_keys::{Key, KeyError};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// One-time key for output `index`, computed by the sender from its random
/// scalar `r` and the receiver's public view `A` and public spend `B`.
pub fn derive_ghost_public(
    r: &Key,
    public_view: &Key,
    public_spend: &Key,
    index: u8,
    version: u8,
) -> Result<Key, KeyError> {
    let r = r.as_scalar()?;
    let shared = r * public_view.as_point()?;
    let x = hash_scalar(&shared, index, HashFamily::for_version(version));
    let ghost = EdwardsPoint::mul_base(&x) + public_spend.as_point()?;
    Ok(Key::from_point(&ghost))
}

/// Spending scalar for output `index`, computed by the receiver from the
/// output mask `R` and its private view `a` and private spend `b`.
pub fn derive_ghost_private(
    mask: &Key,
    private_view: &Key,
    private_spend: &Key,
    index: u8,
    version: u8,
) -> Result<Key, KeyError> {
    let a = private_view.as_scalar()?;
    let shared = a * mask.as_point()?;
    let x = hash_scalar(&shared, index, HashFamily::for_version(version));
    Ok(Key::from_scalar(&(x + private_spend.as_scalar()?)))
}

/// Strip the tweak from a ghost key. The result is the receiver's public
/// spend key when the output belongs to the holder of `private_view`.
pub fn view_ghost_output_key(
    ghost: &Key,
    private_view: &Key,
    mask: &Key,
    index: u8,
    version: u8,
) -> Result<Key, KeyError> {
    let a = private_view.as_scalar()?;
    let shared = a * mask.as_point()?;
    let x = hash_scalar(&shared, index, HashFamily::for_version(version));
    Ok(Key::from_point(&(ghost.as_point()? - EdwardsPoint::mul_base(&x))))
}

/// The mask and per-receiver keys of one output.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct GhostKeys {
    pub mask: Key,
    pub keys: Vec<Key>,
}

impl GhostKeys {
    /// Create the keys of output `index` locally for receivers given as
    /// `(public_view, public_spend)` pairs. One random scalar is shared by
    /// every key of the output.
    pub fn create<R: RngCore + CryptoRng>(
        rng: &mut R,
        receivers: &[(Key, Key)],
        index: u8,
        version: u8,
    ) -> Result<Self, KeyError> {
        let r = Key::random(rng);
        let mask = r.public_key()?;
        let keys = receivers
            .iter()
            .map(|(view, spend)| derive_ghost_public(&r, view, spend, index, version))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { mask, keys })
    }

    /// Position of the key owned by `(private_view, public_spend)`, if any.
    pub fn find_owned(
        &self,
        private_view: &Key,
        public_spend: &Key,
        index: u8,
        version: u8,
    ) -> Result<Option<usize>, KeyError> {
        for (slot, key) in self.keys.iter().enumerate() {
            if view_ghost_output_key(key, private_view, &self.mask, index, version)? == *public_spend
            {
                return Ok(Some(slot));
            }
        }
        Ok(None)
    }
}
