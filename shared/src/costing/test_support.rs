//! Builders for engine tests

use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Item, Product, Recipe};

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn item(name: &str, purchase_cost: &str, base_qty_per_purchase: &str) -> Item {
    Item {
        id: Uuid::new_v4(),
        org_id: Uuid::nil(),
        name: name.to_string(),
        sku: name.to_uppercase(),
        purchase_unit_id: Uuid::nil(),
        purchase_qty: Decimal::ONE,
        purchase_cost: dec(purchase_cost),
        base_unit_id: Uuid::nil(),
        base_qty_per_purchase: dec(base_qty_per_purchase),
        category_id: None,
        active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn recipe(name: &str, yield_qty_g: &str) -> Recipe {
    Recipe {
        id: Uuid::new_v4(),
        org_id: Uuid::nil(),
        name: name.to_string(),
        description: None,
        yield_qty_g: dec(yield_qty_g),
        created_by: None,
        created_at: Utc::now(),
        updated_by: None,
        updated_at: None,
    }
}

pub fn product(name: &str) -> Product {
    Product {
        id: Uuid::new_v4(),
        org_id: Uuid::nil(),
        name: name.to_string(),
        description: None,
        created_by: None,
        created_at: Utc::now(),
        updated_by: None,
        updated_at: None,
    }
}
