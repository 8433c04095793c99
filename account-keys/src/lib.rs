// Copyright (c) 2024 Botho Foundation

#![deny(unsafe_code)]

//! This crate defines account key structures: the private view/spend key
//! pair, the XIN mainnet address over its public keys, and the MIX
//! multi-member address.

mod account_key;
mod address;
mod error;
mod mix_address;

pub use crate::{
    account_key::AccountKey,
    address::{Address, XIN_ADDRESS_PREFIX},
    error::AddressError,
    mix_address::{
        MixAddress, MixMembers, MAX_MIX_MEMBERS, MIX_ADDRESS_PREFIX, MIX_ADDRESS_VERSION,
    },
};
