//! Validation utilities for the Kitchen Costing Platform
//!
//! These run at the data-entry boundary, before anything reaches the cost
//! engine, so bad input is rejected instead of clamped.

use std::collections::HashSet;

use rust_decimal::Decimal;
use uuid::Uuid;

// ============================================================================
// Costing Input Validations
// ============================================================================

/// Validate a money amount (purchase cost) is not negative
pub fn validate_money(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// Validate a quantity used in a recipe or product (zero allowed)
pub fn validate_quantity(qty: Decimal) -> Result<(), &'static str> {
    if qty < Decimal::ZERO {
        return Err("Quantity cannot be negative");
    }
    Ok(())
}

/// Validate a quantity that is later divided by (yield, conversion factor)
pub fn validate_positive_quantity(qty: Decimal) -> Result<(), &'static str> {
    if qty <= Decimal::ZERO {
        return Err("Quantity must be greater than zero");
    }
    Ok(())
}

/// Validate waste percentage is between 0 and 100
pub fn validate_waste_pct(waste_pct: Decimal) -> Result<(), &'static str> {
    if waste_pct < Decimal::ZERO || waste_pct > Decimal::ONE_HUNDRED {
        return Err("Waste percentage must be between 0 and 100");
    }
    Ok(())
}

/// A recipe is created with at least one ingredient
pub fn validate_recipe_composition(ingredient_count: usize) -> Result<(), &'static str> {
    if ingredient_count == 0 {
        return Err("A recipe needs at least one ingredient");
    }
    Ok(())
}

/// A product must use at least one recipe or one direct item
pub fn validate_product_composition(
    recipe_usages: usize,
    item_usages: usize,
) -> Result<(), &'static str> {
    if recipe_usages == 0 && item_usages == 0 {
        return Err("A product needs at least one recipe or item");
    }
    Ok(())
}

/// Each item or recipe may appear only once per recipe/product
pub fn validate_unique_references(ids: &[Uuid]) -> Result<(), &'static str> {
    let mut seen = HashSet::with_capacity(ids.len());
    if ids.iter().all(|id| seen.insert(*id)) {
        Ok(())
    } else {
        Err("The same entry is listed more than once")
    }
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate a display name (item, recipe, product, organization)
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty");
    }
    if trimmed.chars().count() > 200 {
        return Err("Name must be at most 200 characters");
    }
    Ok(())
}

/// Validate SKU format (1-64 alphanumeric, dash or underscore)
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.is_empty() || sku.len() > 64 {
        return Err("SKU must be 1-64 characters");
    }
    if !sku
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err("SKU may only contain letters, digits, '-' and '_'");
    }
    Ok(())
}
