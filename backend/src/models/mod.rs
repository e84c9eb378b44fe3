//! Database models for the Kitchen Costing Platform
//!
//! Re-exports models from the shared crate and adds the row types they are
//! loaded from

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

pub use shared::models::*;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub sku: String,
    pub purchase_unit_id: Uuid,
    pub purchase_qty: Decimal,
    pub purchase_cost: Decimal,
    pub base_unit_id: Uuid,
    pub base_qty_per_purchase: Decimal,
    pub category_id: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            org_id: row.org_id,
            name: row.name,
            sku: row.sku,
            purchase_unit_id: row.purchase_unit_id,
            purchase_qty: row.purchase_qty,
            purchase_cost: row.purchase_cost,
            base_unit_id: row.base_unit_id,
            base_qty_per_purchase: row.base_qty_per_purchase,
            category_id: row.category_id,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub yield_qty_g: Decimal,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Recipe {
            id: row.id,
            org_id: row.org_id,
            name: row.name,
            description: row.description,
            yield_qty_g: row.yield_qty_g,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_by: row.updated_by,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeItemRow {
    pub recipe_id: Uuid,
    pub item_id: Uuid,
    pub qty_g: Decimal,
    pub waste_pct: Decimal,
}

impl From<RecipeItemRow> for RecipeIngredientLine {
    fn from(row: RecipeItemRow) -> Self {
        RecipeIngredientLine {
            recipe_id: row.recipe_id,
            item_id: row.item_id,
            qty_g: row.qty_g,
            waste_pct: row.waste_pct,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            org_id: row.org_id,
            name: row.name,
            description: row.description,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_by: row.updated_by,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRecipeRow {
    pub product_id: Uuid,
    pub recipe_id: Uuid,
    pub qty_g: Decimal,
}

impl From<ProductRecipeRow> for ProductRecipeUsage {
    fn from(row: ProductRecipeRow) -> Self {
        ProductRecipeUsage {
            product_id: row.product_id,
            recipe_id: row.recipe_id,
            qty_g_in_product: row.qty_g,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductItemRow {
    pub product_id: Uuid,
    pub item_id: Uuid,
    pub qty_g: Decimal,
}

impl From<ProductItemRow> for ProductItemUsage {
    fn from(row: ProductItemRow) -> Self {
        ProductItemUsage {
            product_id: row.product_id,
            item_id: row.item_id,
            qty_g: row.qty_g,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UnitRow {
    pub id: Uuid,
    pub name: String,
    pub symbol: String,
    pub unit_type: String,
}

impl TryFrom<UnitRow> for Unit {
    type Error = String;

    fn try_from(row: UnitRow) -> Result<Self, Self::Error> {
        Ok(Unit {
            unit_type: row.unit_type.parse()?,
            id: row.id,
            name: row.name,
            symbol: row.symbol,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            org_id: row.org_id,
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmployeeRow {
    pub id: Uuid,
    pub org_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = String;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Employee {
            role: row.role.parse()?,
            id: row.id,
            org_id: row.org_id,
            email: row.email,
            full_name: row.full_name,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
