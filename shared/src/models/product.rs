//! Finished product models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sellable product composed of recipes and direct items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Grams of a recipe that go into one unit of a product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecipeUsage {
    pub product_id: Uuid,
    pub recipe_id: Uuid,
    pub qty_g_in_product: Decimal,
}

/// Raw item used directly by a product, bypassing any recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductItemUsage {
    pub product_id: Uuid,
    pub item_id: Uuid,
    /// Quantity in the item's base unit
    pub qty_g: Decimal,
}
