// Copyright (c) 2024 Botho Foundation

use crate::{Address, AddressError};
use core::fmt;
use mixin_crypto_keys::{
    deterministic_view_scalar, reduce_uniform, scalar_base_mult, Key, Scalar,
};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// The private view and spend keys of an account.
///
/// This should only ever be present in client code.
#[derive(Clone)]
pub struct AccountKey {
    /// Private key `a` used for view-key matching.
    private_view: Key,

    /// Private key `b` used for spending.
    private_spend: Key,

    address: Address,
}

impl AccountKey {
    /// An account from both private keys. Both must be canonical scalars.
    pub fn new(private_spend: &Key, private_view: &Key) -> Result<Self, AddressError> {
        Ok(Self::from_scalars(
            &private_spend.as_scalar()?,
            &private_view.as_scalar()?,
        ))
    }

    /// An account whose view key is derived from the public spend key, so
    /// its address is a "public" address.
    pub fn from_spend_private(private_spend: &Key) -> Result<Self, AddressError> {
        let spend = private_spend.as_scalar()?;
        let view = deterministic_view_scalar(&scalar_base_mult(&spend));
        Ok(Self::from_scalars(&spend, &view))
    }

    /// An account with a random spend key and a derived view key.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut seed = [0u8; 64];
        rng.fill_bytes(&mut seed);
        let spend = reduce_uniform(&seed);
        seed.zeroize();
        let view = deterministic_view_scalar(&scalar_base_mult(&spend));
        Self::from_scalars(&spend, &view)
    }

    fn from_scalars(spend: &Scalar, view: &Scalar) -> Self {
        Self {
            private_view: Key::from_scalar(view),
            private_spend: Key::from_scalar(spend),
            address: Address::new(scalar_base_mult(spend), scalar_base_mult(view)),
        }
    }

    /// Get the view private key.
    pub fn private_view(&self) -> &Key {
        &self.private_view
    }

    /// Get the spend private key.
    pub fn private_spend(&self) -> &Key {
        &self.private_spend
    }

    pub fn address(&self) -> &Address {
        &self.address
    }
}

impl fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AccountKey")
            .field("address", &self.address.to_string())
            .finish_non_exhaustive()
    }
}

impl Drop for AccountKey {
    fn drop(&mut self) {
        self.private_view.zeroize();
        self.private_spend.zeroize();
    }
}
