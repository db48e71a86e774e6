//! Derived balances.

use finbook_core::Money;

use crate::statement::Statement;

/// Fold a user's entries into their current balance.
///
/// Pure function over one consistent snapshot of the entries; callers are
/// responsible for taking that snapshot under the same serialization
/// boundary as entry creation. Accumulates in i128 so pathological entry
/// sequences cannot wrap.
pub fn balance_of(entries: &[Statement]) -> Money {
    let total: i128 = entries.iter().map(|e| i128::from(e.signed_amount())).sum();
    Money::from_minor_units(total.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
}
