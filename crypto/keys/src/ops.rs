// Copyright (c) 2024 Botho Foundation

//! Scalar and point arithmetic over [`Key`] values.
//!
//! Functions taking a "scalar" key require a canonical scalar encoding and
//! functions taking a "point" key require a decompressible Edwards point.
//! Both fail with a [`KeyError`] rather than reducing or panicking.

use crate::{Key, KeyError};
use curve25519_dalek::{
    edwards::EdwardsPoint,
    scalar::{clamp_integer, Scalar},
};
use sha2::{Digest, Sha512};
use sha3::Sha3_256;

/// Reduce 64 uniform bytes modulo the group order.
pub fn reduce_uniform(bytes: &[u8; 64]) -> Scalar {
    Scalar::from_bytes_mod_order_wide(bytes)
}

/// Turn a 32-byte ed25519 seed into its signing scalar: SHA-512 the seed,
/// clamp the low half, then reduce.
pub fn seed_to_scalar(seed: &[u8; 32]) -> Scalar {
    let digest = Sha512::digest(seed);
    let mut low = [0u8; 32];
    low.copy_from_slice(&digest[..32]);
    Scalar::from_bytes_mod_order(clamp_integer(low))
}

/// `compress(s·B)`.
pub fn scalar_base_mult(s: &Scalar) -> Key {
    Key::from_point(&EdwardsPoint::mul_base(s))
}

/// The public key of a scalar key.
pub fn public(scalar: &Key) -> Result<Key, KeyError> {
    Ok(scalar_base_mult(&scalar.as_scalar()?))
}

/// `compress(s·P)`.
pub fn scalar_mult_point(scalar: &Key, point: &Key) -> Result<Key, KeyError> {
    let s = scalar.as_scalar()?;
    let p = point.as_point()?;
    Ok(Key::from_point(&(s * p)))
}

/// `compress(P + Q)`.
pub fn add_points(p: &Key, q: &Key) -> Result<Key, KeyError> {
    Ok(Key::from_point(&(p.as_point()? + q.as_point()?)))
}

/// `compress(P - Q)`.
pub fn sub_points(p: &Key, q: &Key) -> Result<Key, KeyError> {
    Ok(Key::from_point(&(p.as_point()? - q.as_point()?)))
}

/// Private view key derived from a public spend key alone.
///
/// `h = SHA3-256(spend)`; the view scalar is `h || h` reduced as uniform
/// bytes. Addresses built this way are "public": anyone holding the spend
/// key can recompute the view key.
pub fn deterministic_view_key(public_spend: &Key) -> Key {
    Key::from_scalar(&deterministic_view_scalar(public_spend))
}

/// [`deterministic_view_key`] as a scalar.
pub fn deterministic_view_scalar(public_spend: &Key) -> Scalar {
    let h = Sha3_256::digest(public_spend.as_bytes());
    let mut seed = [0u8; 64];
    seed[..32].copy_from_slice(&h);
    seed[32..].copy_from_slice(&h);
    reduce_uniform(&seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_public_of_one_is_basepoint() {
        let one = Key::from_scalar(&Scalar::ONE);
        let pubkey = public(&one).unwrap();
        assert_eq!(pubkey, Key::from_point(&ED25519_BASEPOINT_POINT));
        assert!(pubkey.is_valid_point());
    }

    #[test]
    fn test_diffie_hellman_agrees() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = Key::random(&mut rng);
        let r = Key::random(&mut rng);
        let big_a = public(&a).unwrap();
        let big_r = public(&r).unwrap();
        assert_eq!(
            scalar_mult_point(&r, &big_a).unwrap(),
            scalar_mult_point(&a, &big_r).unwrap()
        );
    }

    #[test]
    fn test_add_then_sub_points() {
        let mut rng = StdRng::seed_from_u64(8);
        let p = public(&Key::random(&mut rng)).unwrap();
        let q = public(&Key::random(&mut rng)).unwrap();
        let sum = add_points(&p, &q).unwrap();
        assert_eq!(sub_points(&sum, &q).unwrap(), p);
    }

    #[test]
    fn test_seed_path_gives_valid_public() {
        let scalar = seed_to_scalar(&[42u8; 32]);
        let key = Key::from_scalar(&scalar);
        assert!(public(&key).unwrap().is_valid_point());
    }

    #[test]
    fn test_non_canonical_scalar_rejected() {
        let key = Key::from_bytes([0xff; 32]);
        assert_matches!(public(&key), Err(KeyError::NonCanonicalScalar));
    }

    #[test]
    fn test_deterministic_view_key_is_stable() {
        let spend: Key = "d03ac2718891838840c55f681b6b049af5b9efbf0d7d2a06d6741bbc17f68262"
            .parse()
            .unwrap();
        let a = deterministic_view_key(&spend);
        let b = deterministic_view_key(&spend);
        assert_eq!(a, b);
        assert!(a.as_scalar().is_ok());
        assert_eq!(a, spend.deterministic_hash_derive());
    }
}
