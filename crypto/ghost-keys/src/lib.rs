// Copyright (c) 2024 Botho Foundation

#![deny(unsafe_code)]

//! Ghost keys: one-time public keys for transaction outputs.
//!
//! # Protocol
//!
//! **Sender (creating output `i`):**
//! 1. Pick a random scalar `r` and publish the mask `R = r·G`.
//! 2. For each receiver with public view `A` and public spend `B`, compute
//!    `x = Hs(r·A, i)` and the one-time key `P = x·G + B`.
//!
//! **Receiver (scanning output `i`):**
//! 1. Compute `x = Hs(a·R, i)` with the private view scalar `a`.
//! 2. If `P - x·G == B` the output is theirs.
//! 3. The spending scalar is `x + b`.
//!
//! `Hs` hashes with SHA3-256 for transaction versions below 5 and BLAKE3
//! from version 5 on.

mod family;
mod ghost_keys;

pub use crate::{
    family::{hash_scalar, HashFamily},
    ghost_keys::{
        derive_ghost_private, derive_ghost_public, view_ghost_output_key, GhostKeys,
    },
};
