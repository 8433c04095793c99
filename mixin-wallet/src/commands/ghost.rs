// Copyright (c) 2024 Botho Foundation

//! Ghost key command

use anyhow::{bail, Result};
use mixin_account_keys::Address;
use mixin_crypto_ghost_keys::GhostKeys;
use rand::{CryptoRng, RngCore};

/// Derive the ghost keys of output `index` for `receivers`
pub fn derive<R: RngCore + CryptoRng>(
    rng: &mut R,
    receivers: &[Address],
    index: u8,
    version: u8,
) -> Result<GhostKeys> {
    if receivers.is_empty() {
        bail!("at least one receiver is required");
    }
    let pairs: Vec<_> = receivers.iter().map(Address::ghost_receiver).collect();
    Ok(GhostKeys::create(rng, &pairs, index, version)?)
}

/// Run the ghost command
pub fn run(receivers: &[Address], index: u8, version: u8) -> Result<()> {
    let ghost = derive(&mut rand::thread_rng(), receivers, index, version)?;
    println!("{}", serde_json::to_string_pretty(&ghost)?);
    Ok(())
}
