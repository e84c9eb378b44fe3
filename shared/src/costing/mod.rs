//! Cost aggregation engine
//!
//! Costs flow one way: item -> recipe -> product. Every function here is pure;
//! callers resolve current item and recipe data (see [`CostSource`]) and the
//! engine derives totals from it. Nothing computed here is meant to be stored.
//!
//! All money and quantities are [`Decimal`]. Arithmetic is checked, so an
//! overflow surfaces as [`CostingError::Overflow`] instead of a panic.

mod error;
mod product;
mod recipe;
mod source;
mod units;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::*;
pub use product::*;
pub use recipe::*;
pub use source::*;
pub use units::*;

use rust_decimal::Decimal;

pub(crate) fn checked_mul(
    a: Decimal,
    b: Decimal,
    operation: &'static str,
) -> CostingResult<Decimal> {
    a.checked_mul(b).ok_or(CostingError::Overflow { operation })
}

pub(crate) fn checked_div(
    a: Decimal,
    b: Decimal,
    operation: &'static str,
) -> CostingResult<Decimal> {
    a.checked_div(b).ok_or(CostingError::Overflow { operation })
}

/// Exact decimal sum, independent of the order of `values`
pub(crate) fn checked_sum<I>(values: I, operation: &'static str) -> CostingResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, |acc, value| {
        acc.checked_add(value)
            .ok_or(CostingError::Overflow { operation })
    })
}

pub(crate) fn ensure_non_negative(value: Decimal, field: impl Into<String>) -> CostingResult<()> {
    if value < Decimal::ZERO {
        return Err(CostingError::validation(field, "must not be negative"));
    }
    Ok(())
}

pub(crate) fn ensure_waste_pct(value: Decimal, field: impl Into<String>) -> CostingResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(CostingError::validation(field, "must be between 0 and 100"));
    }
    Ok(())
}
