// Copyright (c) 2024 Botho Foundation

//! Schnorr-style signatures over ed25519 with a raw scalar as the signing
//! key.
//!
//! The equations match RFC 8032 Ed25519, but the nonce prefix is taken from
//! `SHA-512(scalar)` rather than from a 32-byte seed, so ghost private keys
//! (which only exist as scalars) can sign.

use crate::{ops::reduce_uniform, Hash, Key, KeyError};
use curve25519_dalek::{edwards::EdwardsPoint, scalar::Scalar};
use sha2::{Digest, Sha512};
use std::str::FromStr;

/// `R || s`, 64 bytes.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Signature(pub [u8; 64]);

impl_hex_bytes!(Signature, 64);

impl Default for Signature {
    fn default() -> Self {
        Self([0u8; 64])
    }
}

impl FromStr for Signature {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode_hex_exact(s)
    }
}

fn sha512_scalar(parts: &[&[u8]]) -> Scalar {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&hasher.finalize());
    reduce_uniform(&wide)
}

/// Sign `message` with the scalar key `a`.
pub fn sign(a: &Key, message: &[u8]) -> Result<Signature, KeyError> {
    let scalar = a.as_scalar()?;
    let prefix = Sha512::digest(a.as_bytes());

    let r = sha512_scalar(&[&prefix[32..], message]);
    let big_r = EdwardsPoint::mul_base(&r).compress();
    let big_a = EdwardsPoint::mul_base(&scalar).compress();
    let k = sha512_scalar(&[&big_r.as_bytes()[..], &big_a.as_bytes()[..], message]);
    let s = k * scalar + r;

    let mut out = [0u8; 64];
    out[..32].copy_from_slice(big_r.as_bytes());
    out[32..].copy_from_slice(s.as_bytes());
    Ok(Signature(out))
}

/// Check `sig` over `message` against the public point `public`.
///
/// Fails on a non-canonical `s`, an undecodable public key, or a mismatched
/// `R`.
pub fn verify(public: &Key, message: &[u8], sig: &Signature) -> bool {
    let Ok(big_a) = public.as_point() else {
        return false;
    };
    let mut s_bytes = [0u8; 32];
    s_bytes.copy_from_slice(&sig.0[32..]);
    let Some(s) = Option::<Scalar>::from(Scalar::from_canonical_bytes(s_bytes)) else {
        return false;
    };

    let k = sha512_scalar(&[&sig.0[..32], &public.as_bytes()[..], message]);
    let check = EdwardsPoint::vartime_double_scalar_mul_basepoint(&k, &(-big_a), &s);
    check.compress().as_bytes() == &sig.0[..32]
}

/// Sign the 32 bytes of a hash.
pub fn sign_hash(a: &Key, hash: &Hash) -> Result<Signature, KeyError> {
    sign(a, hash.as_bytes())
}

pub fn verify_hash(public: &Key, hash: &Hash, sig: &Signature) -> bool {
    verify(public, hash.as_bytes(), sig)
}
