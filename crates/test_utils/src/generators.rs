//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{CurrencyCode, Money};
use domain_cover::Verdict;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for valid currency symbols (1 to 8 uppercase letters or digits)
pub fn currency_symbol_strategy() -> impl Strategy<Value = CurrencyCode> {
    "[A-Z][A-Z0-9]{0,7}".prop_map(|s| CurrencyCode::new(&s).expect("pattern yields valid symbols"))
}

/// Strategy for positive amounts with up to 18 decimals
pub fn positive_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000_000i64, 0u32..=18u32).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

/// Strategy for positive Money in the given currency
pub fn positive_money_strategy(currency: CurrencyCode) -> impl Strategy<Value = Money> {
    positive_amount_strategy().prop_map(move |amount| Money::new(amount, currency))
}

/// Strategy for assessment verdicts
pub fn verdict_strategy() -> impl Strategy<Value = Verdict> {
    prop_oneof![
        Just(Verdict::Pending),
        Just(Verdict::Accepted),
        Just(Verdict::Denied),
    ]
}

/// Strategy for final (non-pending) verdicts
pub fn final_verdict_strategy() -> impl Strategy<Value = Verdict> {
    prop_oneof![Just(Verdict::Accepted), Just(Verdict::Denied)]
}

/// Strategy for a batch of distinct legacy token numbers with one marked to fail
///
/// Yields `(ids, failing_index)` with `failing_index < ids.len()`.
pub fn batch_with_failure_strategy(max_len: usize) -> impl Strategy<Value = (Vec<u64>, usize)> {
    proptest::collection::btree_set(1u64..500, 1..=max_len).prop_flat_map(|ids| {
        let ids: Vec<u64> = ids.into_iter().collect();
        let len = ids.len();
        (Just(ids), 0..len)
    })
}
