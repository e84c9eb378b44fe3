//! Recipe models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named preparation with a total yield
///
/// Costs are not stored on the recipe; they are derived from the ingredient
/// lines and the current item costs whenever they are needed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Total output of one batch, in grams
    pub yield_qty_g: Decimal,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// An item consumed by a recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeIngredientLine {
    pub recipe_id: Uuid,
    pub item_id: Uuid,
    /// Quantity consumed, in the item's base unit
    pub qty_g: Decimal,
    /// Recorded waste percentage (0-100). Informational only.
    pub waste_pct: Decimal,
}
