//! Unit and quantity normalization
//!
//! Items are bought in purchase units (a 25 kg sack, a 1 l bottle) and
//! consumed in base units (g, ml, pc). The conversion factor between the two
//! is `base_qty_per_purchase`, which also yields the cost of one base unit.

use rust_decimal::Decimal;

use super::{checked_div, checked_mul, CostingError, CostingResult};
use crate::models::Item;
use crate::types::UnitType;

/// Cost of one base unit: `purchase_cost / base_qty_per_purchase`
///
/// A zero or negative conversion factor is rejected instead of divided by.
pub fn cost_per_base_unit(
    purchase_cost: Decimal,
    base_qty_per_purchase: Decimal,
) -> CostingResult<Decimal> {
    if purchase_cost < Decimal::ZERO {
        return Err(CostingError::validation(
            "purchase_cost",
            "must not be negative",
        ));
    }
    if base_qty_per_purchase <= Decimal::ZERO {
        return Err(CostingError::DivisionByZero {
            field: "base_qty_per_purchase",
        });
    }
    checked_div(purchase_cost, base_qty_per_purchase, "cost_per_base_unit")
}

/// Cost of one base unit of `item`, from its current purchase data
pub fn compute_item_cost_per_base_unit(item: &Item) -> CostingResult<Decimal> {
    cost_per_base_unit(item.purchase_cost, item.base_qty_per_purchase)
}

/// A known unit symbol with its size expressed in its type's base unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSpec {
    pub unit_type: UnitType,
    pub to_base: Decimal,
}

/// Look up a unit by symbol (case-insensitive)
pub fn unit_spec(symbol: &str) -> Option<UnitSpec> {
    let (unit_type, to_base) = match symbol.trim().to_ascii_lowercase().as_str() {
        "mg" => (UnitType::Mass, Decimal::new(1, 3)),
        "g" => (UnitType::Mass, Decimal::ONE),
        "kg" => (UnitType::Mass, Decimal::ONE_THOUSAND),
        "oz" => (UnitType::Mass, Decimal::new(28_349_523_125, 9)),
        "lb" => (UnitType::Mass, Decimal::new(45_359_237, 5)),
        "ml" => (UnitType::Volume, Decimal::ONE),
        "cl" => (UnitType::Volume, Decimal::TEN),
        "l" => (UnitType::Volume, Decimal::ONE_THOUSAND),
        "pc" => (UnitType::Count, Decimal::ONE),
        "dozen" => (UnitType::Count, Decimal::new(12, 0)),
        _ => return None,
    };
    Some(UnitSpec { unit_type, to_base })
}

/// Multiplier turning a quantity in `from` into a quantity in `to`
pub fn conversion_factor(from: &str, to: &str) -> CostingResult<Decimal> {
    let from_spec = unit_spec(from)
        .ok_or_else(|| CostingError::validation("unit", format!("unknown unit '{}'", from)))?;
    let to_spec = unit_spec(to)
        .ok_or_else(|| CostingError::validation("unit", format!("unknown unit '{}'", to)))?;

    if from_spec.unit_type != to_spec.unit_type {
        return Err(CostingError::validation(
            "unit",
            format!(
                "cannot convert {} ({}) to {} ({})",
                from, from_spec.unit_type, to, to_spec.unit_type
            ),
        ));
    }

    checked_div(from_spec.to_base, to_spec.to_base, "conversion_factor")
}

/// Convert `qty` from one unit to another of the same type
pub fn convert_quantity(qty: Decimal, from: &str, to: &str) -> CostingResult<Decimal> {
    let factor = conversion_factor(from, to)?;
    checked_mul(qty, factor, "convert_quantity")
}

/// Derive `base_qty_per_purchase` from the purchase quantity and units
///
/// e.g. 2 x kg into g gives 2000.
pub fn base_qty_for_purchase(
    purchase_qty: Decimal,
    purchase_unit: &str,
    base_unit: &str,
) -> CostingResult<Decimal> {
    if purchase_qty <= Decimal::ZERO {
        return Err(CostingError::validation(
            "purchase_qty",
            "must be greater than zero",
        ));
    }
    convert_quantity(purchase_qty, purchase_unit, base_unit)
}
