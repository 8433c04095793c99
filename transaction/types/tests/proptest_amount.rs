// Copyright (c) 2024 Botho Foundation

//! Property-based tests for decimal amounts.

use mixin_transaction_types::Integer;
use proptest::prelude::*;

proptest! {
    /// Property: any positive decimal with at most 8 fractional digits reads
    /// back to the same value through the wire bytes and the display form.
    #[test]
    fn prop_decimal_roundtrip(whole in 0u64..10_000_000_000, frac in 0u64..100_000_000) {
        prop_assume!(whole > 0 || frac > 0);
        let text = format!("{whole}.{frac:08}");
        let amount: Integer = text.parse().unwrap();
        prop_assert_eq!(amount.to_string(), text);

        let wire = Integer::from_be_bytes(&amount.to_be_bytes()).unwrap();
        prop_assert_eq!(wire, amount);
    }

    /// Property: subtraction undoes addition and never goes below zero.
    #[test]
    fn prop_add_sub(a in 0u64..u64::MAX / 2, b in 0u64..u64::MAX / 2) {
        let x = Integer::from_units(a);
        let y = Integer::from_units(b);
        let sum = x.checked_add(y).unwrap();
        prop_assert_eq!(sum.checked_sub(y).unwrap(), x);
        prop_assert_eq!(x.checked_sub(y).is_ok(), a >= b);
    }
}
