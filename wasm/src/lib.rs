//! WebAssembly module for the Kitchen Costing Platform
//!
//! Runs the shared cost engine in the browser so recipe and product forms can
//! show live totals before anything is saved. Amounts cross the boundary as
//! decimal strings and structures as JSON, never as floats.

use std::str::FromStr;

use rust_decimal::Decimal;
use shared::api::{ProductCostDraft, RecipeCostDraft};
use shared::{aggregate_product, aggregate_recipe, CostingError};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("kitchen costing engine loaded"));
}

fn parse_decimal(field: &str, value: &str) -> Result<Decimal, String> {
    Decimal::from_str(value.trim()).map_err(|e| format!("Invalid {} '{}': {}", field, value, e))
}

fn engine_error(err: CostingError) -> String {
    err.to_string()
}

fn to_js_error(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    js_sys::Error::new(&message).into()
}

fn item_cost_per_base_unit_inner(
    purchase_cost: &str,
    base_qty_per_purchase: &str,
) -> Result<String, String> {
    let cost = parse_decimal("purchase_cost", purchase_cost)?;
    let base_qty = parse_decimal("base_qty_per_purchase", base_qty_per_purchase)?;
    shared::cost_per_base_unit(cost, base_qty)
        .map(|c| c.normalize().to_string())
        .map_err(engine_error)
}

fn recipe_cost_inner(draft_json: &str) -> Result<String, String> {
    let draft: RecipeCostDraft =
        serde_json::from_str(draft_json).map_err(|e| format!("Invalid recipe JSON: {}", e))?;
    let cost = aggregate_recipe(draft.yield_qty_g, &draft.ingredients).map_err(engine_error)?;
    serde_json::to_string(&cost).map_err(|e| e.to_string())
}

fn product_cost_inner(draft_json: &str) -> Result<String, String> {
    let draft: ProductCostDraft =
        serde_json::from_str(draft_json).map_err(|e| format!("Invalid product JSON: {}", e))?;
    let cost = aggregate_product(&draft.recipes, &draft.items).map_err(engine_error)?;
    serde_json::to_string(&cost).map_err(|e| e.to_string())
}

fn validate_product_draft_inner(draft_json: &str) -> Result<(), String> {
    let draft: ProductCostDraft =
        serde_json::from_str(draft_json).map_err(|e| format!("Invalid product JSON: {}", e))?;
    validate_product_composition(draft.recipes.len(), draft.items.len()).map_err(str::to_string)
}

fn convert_quantity_inner(qty: &str, from: &str, to: &str) -> Result<String, String> {
    let qty = parse_decimal("quantity", qty)?;
    shared::convert_quantity(qty, from, to)
        .map(|q| q.normalize().to_string())
        .map_err(engine_error)
}

/// Cost of one base unit, e.g. `("10.00", "1000")` gives `"0.01"`
#[wasm_bindgen]
pub fn item_cost_per_base_unit(
    purchase_cost: &str,
    base_qty_per_purchase: &str,
) -> Result<String, JsValue> {
    item_cost_per_base_unit_inner(purchase_cost, base_qty_per_purchase).map_err(to_js_error)
}

/// Price an unsaved recipe; takes and returns JSON
#[wasm_bindgen]
pub fn recipe_cost(draft_json: &str) -> Result<String, JsValue> {
    recipe_cost_inner(draft_json).map_err(to_js_error)
}

/// Price an unsaved product with its full breakdown; takes and returns JSON
#[wasm_bindgen]
pub fn product_cost(draft_json: &str) -> Result<String, JsValue> {
    product_cost_inner(draft_json).map_err(to_js_error)
}

/// Check a product draft uses at least one recipe or item
#[wasm_bindgen]
pub fn validate_product_draft(draft_json: &str) -> Result<(), JsValue> {
    validate_product_draft_inner(draft_json).map_err(to_js_error)
}

/// Convert a quantity between units of the same kind (`kg` to `g`, `l` to `ml`)
#[wasm_bindgen]
pub fn convert_quantity(qty: &str, from: &str, to: &str) -> Result<String, JsValue> {
    convert_quantity_inner(qty, from, to).map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_cost_per_base_unit() {
        assert_eq!(item_cost_per_base_unit_inner("10.00", "1000").unwrap(), "0.01");
        assert!(item_cost_per_base_unit_inner("10.00", "0").is_err());
        assert!(item_cost_per_base_unit_inner("ten", "1000").is_err());
    }

    #[test]
    fn test_recipe_cost_draft() {
        let json = r#"{
            "yield_qty_g": "1000",
            "ingredients": [
                {"item_id": "00000000-0000-0000-0000-000000000001", "item_name": "A",
                 "qty_g": "500", "cost_per_base_unit": "0.01"},
                {"item_id": "00000000-0000-0000-0000-000000000002", "item_name": "B",
                 "qty_g": "500", "waste_pct": "5", "cost_per_base_unit": "0.02"}
            ]
        }"#;
        let out: serde_json::Value =
            serde_json::from_str(&recipe_cost_inner(json).unwrap()).unwrap();
        let total = Decimal::from_str(out["total_recipe_cost"].as_str().unwrap()).unwrap();
        let per_gram = Decimal::from_str(out["recipe_cost_per_gram"].as_str().unwrap()).unwrap();
        assert_eq!(total, Decimal::from(15));
        assert_eq!(per_gram, Decimal::new(15, 3));
    }

    #[test]
    fn test_recipe_zero_yield_reported() {
        let json = r#"{"yield_qty_g": "0", "ingredients": []}"#;
        let err = recipe_cost_inner(json).unwrap_err();
        assert!(err.contains("yield_qty_g"));
    }

    #[test]
    fn test_product_cost_draft() {
        let json = r#"{
            "recipes": [{
                "recipe_id": "00000000-0000-0000-0000-000000000010",
                "name": "Sauce",
                "qty_g_in_product": "200",
                "yield_qty_g": "1000",
                "ingredients": [
                    {"item_id": "00000000-0000-0000-0000-000000000001", "item_name": "A",
                     "qty_g": "500", "cost_per_base_unit": "0.01"},
                    {"item_id": "00000000-0000-0000-0000-000000000002", "item_name": "B",
                     "qty_g": "500", "cost_per_base_unit": "0.02"}
                ]
            }],
            "items": [{
                "item_id": "00000000-0000-0000-0000-000000000003",
                "name": "C",
                "qty_g": "100",
                "cost_per_base_unit": "0.05"
            }]
        }"#;
        let out: serde_json::Value =
            serde_json::from_str(&product_cost_inner(json).unwrap()).unwrap();
        let total =
            Decimal::from_str(out["total_finished_product_cost"].as_str().unwrap()).unwrap();
        assert_eq!(total, Decimal::from(8));
    }

    #[test]
    fn test_empty_product_draft_rejected() {
        assert!(validate_product_draft_inner(r#"{"recipes": [], "items": []}"#).is_err());
        assert!(validate_product_draft_inner("{}").is_err());
    }

    #[test]
    fn test_convert_quantity() {
        assert_eq!(convert_quantity_inner("2", "kg", "g").unwrap(), "2000");
        assert_eq!(convert_quantity_inner("250", "ml", "l").unwrap(), "0.25");
        assert!(convert_quantity_inner("1", "kg", "ml").is_err());
    }
}
