// Copyright (c) 2024 Botho Foundation

#![deny(unsafe_code)]

//! Fixed-width key material of the Mixin kernel and the ed25519 scalar and
//! point arithmetic built on it.
//!
//! A [`Key`] is 32 bytes that are read either as a canonical ed25519 scalar
//! (a private key) or as a compressed Edwards point (a public key). The
//! interpretation is chosen by the operation, not by the type, matching the
//! way the kernel stores both kinds of key in the same slots.

#[macro_use]
mod bytes;
mod error;
mod hash;
mod key;
mod ops;
mod signature;

pub use crate::{
    error::KeyError,
    hash::Hash,
    key::Key,
    ops::{
        add_points, deterministic_view_key, deterministic_view_scalar, public, reduce_uniform,
        scalar_base_mult, scalar_mult_point, seed_to_scalar, sub_points,
    },
    signature::{sign, sign_hash, verify, verify_hash, Signature},
};

pub use curve25519_dalek::{edwards::EdwardsPoint, scalar::Scalar};
