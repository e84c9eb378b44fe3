//! Inventory item models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::costing::{compute_item_cost_per_base_unit, CostingResult};
use crate::types::UnitType;

/// A purchasable ingredient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub sku: String,
    pub purchase_unit_id: Uuid,
    /// How many purchase units one purchase contains (e.g. 1 bag)
    pub purchase_qty: Decimal,
    /// Price paid for one purchase
    pub purchase_cost: Decimal,
    pub base_unit_id: Uuid,
    /// Base units (usually grams) contained in one purchase
    pub base_qty_per_purchase: Decimal,
    pub category_id: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn cost_per_base_unit(&self) -> CostingResult<Decimal> {
        compute_item_cost_per_base_unit(self)
    }
}

/// A unit of measure (reference data)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Unit {
    pub id: Uuid,
    pub name: String,
    pub symbol: String,
    pub unit_type: UnitType,
}

/// Item category within an organization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
}
