//! Cost aggregation tests
//!
//! Tests for the cost engine including:
//! - Item cost per base unit
//! - Recipe totals and cost per gram
//! - Product totals and breakdown
//! - Worked scenarios from the costing sheets

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::api::{CreateProductRequest, ProductItemInput};
use shared::{
    aggregate_product, aggregate_recipe, compute_product_cost, compute_recipe_cost,
    cost_per_base_unit, validate_product_composition, CostSnapshot, CostingError, Item, Product,
    ProductItemUsage, ProductRecipeUsage, Recipe, RecipeIngredientLine, ResolvedIngredient,
    ResolvedItemUsage, ResolvedRecipeUsage,
};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn item(name: &str, purchase_cost: &str, base_qty_per_purchase: &str) -> Item {
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

fn recipe(name: &str, yield_qty_g: &str) -> Recipe {
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

fn product(name: &str) -> Product {
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

fn line(recipe: &Recipe, item: &Item, qty_g: &str) -> RecipeIngredientLine {
    RecipeIngredientLine {
        recipe_id: recipe.id,
        item_id: item.id,
        qty_g: dec(qty_g),
        waste_pct: Decimal::ZERO,
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[cfg(test)]
mod scenario_tests {
    use super::*;

    /// A: 10.00 for 1000 g costs 0.01 per gram
    #[test]
    fn test_scenario_a_item_cost() {
        let flour = item("Flour", "10.00", "1000");
        assert_eq!(
            cost_per_base_unit(flour.purchase_cost, flour.base_qty_per_purchase).unwrap(),
            dec("0.01")
        );
        assert_eq!(flour.cost_per_base_unit().unwrap(), dec("0.01"));
    }

    /// B: 500 g at 0.01 plus 500 g at 0.02, yield 1000 g
    #[test]
    fn test_scenario_b_recipe_cost() {
        let a = item("A", "10.00", "1000");
        let b = item("B", "20.00", "1000");
        let sauce = recipe("Sauce", "1000");
        let lines = vec![line(&sauce, &a, "500"), line(&sauce, &b, "500")];
        let snapshot = CostSnapshot::new().with_item(a).with_item(b);

        let cost = compute_recipe_cost(&sauce, &lines, &snapshot).unwrap();
        assert_eq!(cost.total_recipe_cost, dec("15.00"));
        assert_eq!(cost.recipe_cost_per_gram, dec("0.015"));
    }

    /// C: 200 g of the B recipe plus 100 g of an item at 0.05
    #[test]
    fn test_scenario_c_product_cost() {
        let a = item("A", "10.00", "1000");
        let b = item("B", "20.00", "1000");
        let c = item("C", "50.00", "1000");
        let sauce = recipe("Sauce", "1000");
        let burger = product("Burger");
        let lines = vec![line(&sauce, &a, "500"), line(&sauce, &b, "500")];
        let recipe_usages = vec![ProductRecipeUsage {
            product_id: burger.id,
            recipe_id: sauce.id,
            qty_g_in_product: dec("200"),
        }];
        let item_usages = vec![ProductItemUsage {
            product_id: burger.id,
            item_id: c.id,
            qty_g: dec("100"),
        }];
        let snapshot = CostSnapshot::new()
            .with_item(a)
            .with_item(b)
            .with_item(c)
            .with_recipe(sauce, lines);

        let cost = compute_product_cost(&burger, &recipe_usages, &item_usages, &snapshot).unwrap();
        assert_eq!(cost.total_recipes_cost, dec("3.00"));
        assert_eq!(cost.total_direct_items_cost, dec("5.00"));
        assert_eq!(cost.total_finished_product_cost, dec("8.00"));

        let sauce_in_burger = &cost.recipes[0];
        let share: Decimal = sauce_in_burger.items.iter().map(|i| i.cost_in_product).sum();
        assert_eq!(share, sauce_in_burger.cost_for_recipe_in_product);
    }

    /// D: a recipe with zero yield cannot be priced
    #[test]
    fn test_scenario_d_zero_yield() {
        let a = item("A", "10.00", "1000");
        let broken = recipe("Broken", "0");
        let lines = vec![line(&broken, &a, "500")];
        let snapshot = CostSnapshot::new().with_item(a);

        let err = compute_recipe_cost(&broken, &lines, &snapshot).unwrap_err();
        assert_eq!(err, CostingError::DivisionByZero { field: "yield_qty_g" });
    }

    /// E: a product with neither recipes nor items is refused at entry
    #[test]
    fn test_scenario_e_empty_product() {
        assert!(validate_product_composition(0, 0).is_err());

        let request = CreateProductRequest {
            name: "Nothing".to_string(),
            description: None,
            recipes: vec![],
            items: vec![],
        };
        assert!(request.validate().is_err());

        let with_item = CreateProductRequest {
            items: vec![ProductItemInput {
                item_id: Uuid::new_v4(),
                qty_g: dec("10"),
            }],
            ..request
        };
        assert!(with_item.validate().is_ok());
    }

    /// Changing an item price changes every recipe using it on the next read
    #[test]
    fn test_price_change_propagates() {
        let a = item("A", "10.00", "1000");
        let sauce = recipe("Sauce", "500");
        let lines = vec![line(&sauce, &a, "500")];

        let snapshot = CostSnapshot::new().with_item(a.clone());
        let before = compute_recipe_cost(&sauce, &lines, &snapshot).unwrap();

        let mut dearer = a;
        dearer.purchase_cost = dec("12.00");
        let snapshot = CostSnapshot::new().with_item(dearer);
        let after = compute_recipe_cost(&sauce, &lines, &snapshot).unwrap();

        assert_eq!(before.total_recipe_cost, dec("5.00"));
        assert_eq!(after.total_recipe_cost, dec("6.00"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Money with two decimals, 0.00 to 1000.00
    fn money_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=100_000i64).prop_map(|v| Decimal::new(v, 2))
    }

    /// Grams with one decimal, 0.0 to 5000.0
    fn grams_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=50_000i64).prop_map(|v| Decimal::new(v, 1))
    }

    /// Cost per gram with four decimals
    fn unit_cost_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10_000i64).prop_map(|v| Decimal::new(v, 4))
    }

    fn ingredient_strategy() -> impl Strategy<Value = ResolvedIngredient> {
        (grams_strategy(), unit_cost_strategy(), 0i64..=100i64).prop_map(|(qty_g, cost, waste)| {
            ResolvedIngredient {
                item_id: Uuid::new_v4(),
                item_name: "Ingredient".to_string(),
                qty_g,
                waste_pct: Decimal::from(waste),
                cost_per_base_unit: cost,
            }
        })
    }

    fn item_usage_strategy() -> impl Strategy<Value = ResolvedItemUsage> {
        (grams_strategy(), unit_cost_strategy()).prop_map(|(qty_g, cost)| ResolvedItemUsage {
            item_id: Uuid::new_v4(),
            name: "Item".to_string(),
            qty_g,
            cost_per_base_unit: cost,
        })
    }

    fn recipe_usage_strategy() -> impl Strategy<Value = ResolvedRecipeUsage> {
        (
            grams_strategy(),
            1i64..=5_000i64,
            prop::collection::vec(ingredient_strategy(), 0..6),
        )
            .prop_map(|(qty, yield_g, ingredients)| ResolvedRecipeUsage {
                recipe_id: Uuid::new_v4(),
                name: "Recipe".to_string(),
                qty_g_in_product: qty,
                yield_qty_g: Decimal::from(yield_g),
                ingredients,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Cost per base unit is purchase cost over base quantity
        #[test]
        fn prop_cost_per_base_unit_formula(
            cost in money_strategy(),
            base_qty in 1i64..=100_000i64,
        ) {
            let base_qty = Decimal::from(base_qty);
            let result = cost_per_base_unit(cost, base_qty).unwrap();
            prop_assert_eq!(result, cost / base_qty);
        }

        /// A zero or negative base quantity never divides
        #[test]
        fn prop_non_positive_base_qty_rejected(
            cost in money_strategy(),
            base_qty in -1000i64..=0i64,
        ) {
            let result = cost_per_base_unit(cost, Decimal::from(base_qty));
            let is_division_by_zero = matches!(result, Err(CostingError::DivisionByZero { .. }));
            prop_assert!(is_division_by_zero);
        }

        /// Recipe totals do not depend on ingredient order
        #[test]
        fn prop_recipe_total_order_independent(
            ingredients in prop::collection::vec(ingredient_strategy(), 0..12),
            yield_g in 1i64..=10_000i64,
            rotation in 0usize..12usize,
        ) {
            let yield_qty = Decimal::from(yield_g);
            let baseline = aggregate_recipe(yield_qty, &ingredients).unwrap();

            let mut reversed = ingredients.clone();
            reversed.reverse();
            let mut rotated = ingredients.clone();
            if !rotated.is_empty() {
                let by = rotation % rotated.len();
                rotated.rotate_left(by);
            }

            let reversed = aggregate_recipe(yield_qty, &reversed).unwrap();
            let rotated = aggregate_recipe(yield_qty, &rotated).unwrap();
            prop_assert_eq!(reversed.total_recipe_cost, baseline.total_recipe_cost);
            prop_assert_eq!(rotated.total_recipe_cost, baseline.total_recipe_cost);
        }

        /// Total is the exact sum of line costs, per gram is total over yield
        #[test]
        fn prop_recipe_total_and_per_gram(
            ingredients in prop::collection::vec(ingredient_strategy(), 0..12),
            yield_g in 1i64..=10_000i64,
        ) {
            let yield_qty = Decimal::from(yield_g);
            let cost = aggregate_recipe(yield_qty, &ingredients).unwrap();

            let expected: Decimal =
                ingredients.iter().map(|i| i.qty_g * i.cost_per_base_unit).sum();
            prop_assert_eq!(cost.total_recipe_cost, expected);
            prop_assert_eq!(cost.recipe_cost_per_gram, expected / yield_qty);
        }

        /// Waste percentage never changes the cost
        #[test]
        fn prop_waste_does_not_change_cost(
            ingredients in prop::collection::vec(ingredient_strategy(), 1..8),
            yield_g in 1i64..=10_000i64,
        ) {
            let yield_qty = Decimal::from(yield_g);
            let without_waste: Vec<ResolvedIngredient> = ingredients
                .iter()
                .cloned()
                .map(|mut i| { i.waste_pct = Decimal::ZERO; i })
                .collect();

            prop_assert_eq!(
                aggregate_recipe(yield_qty, &ingredients).unwrap().total_recipe_cost,
                aggregate_recipe(yield_qty, &without_waste).unwrap().total_recipe_cost
            );
        }

        /// Any yield at or below zero is a division error
        #[test]
        fn prop_non_positive_yield_rejected(
            ingredients in prop::collection::vec(ingredient_strategy(), 0..4),
            yield_g in -1000i64..=0i64,
        ) {
            let result = aggregate_recipe(Decimal::from(yield_g), &ingredients);
            prop_assert_eq!(
                result.unwrap_err(),
                CostingError::DivisionByZero { field: "yield_qty_g" }
            );
        }

        /// Finished cost is exactly recipes plus direct items
        #[test]
        fn prop_product_total_identity(
            recipes in prop::collection::vec(recipe_usage_strategy(), 0..4),
            items in prop::collection::vec(item_usage_strategy(), 0..6),
        ) {
            let cost = aggregate_product(&recipes, &items).unwrap();

            prop_assert_eq!(
                cost.total_finished_product_cost,
                cost.total_recipes_cost + cost.total_direct_items_cost
            );

            let recipe_sum: Decimal =
                cost.recipes.iter().map(|r| r.cost_for_recipe_in_product).sum();
            let item_sum: Decimal =
                cost.direct_items.iter().map(|i| i.cost_for_item_in_product).sum();
            prop_assert_eq!(cost.total_recipes_cost, recipe_sum);
            prop_assert_eq!(cost.total_direct_items_cost, item_sum);
        }

        /// Ingredient shares add up to each recipe's cost in the product
        #[test]
        fn prop_ingredient_shares_sum_to_recipe_in_product(
            recipes in prop::collection::vec(recipe_usage_strategy(), 1..4),
        ) {
            let cost = aggregate_product(&recipes, &[]).unwrap();

            for recipe in &cost.recipes {
                let shares: Decimal = recipe.items.iter().map(|i| i.cost_in_product).sum();
                prop_assert_eq!(shares, recipe.cost_for_recipe_in_product);
                prop_assert_eq!(
                    recipe.cost_for_recipe_in_product,
                    recipe.qty_g_in_product * recipe.recipe_cost_per_gram
                );
                for share in &recipe.items {
                    prop_assert!(share.cost_in_product >= Decimal::ZERO);
                }
            }
        }

        /// Same inputs, same result
        #[test]
        fn prop_product_cost_idempotent(
            recipes in prop::collection::vec(recipe_usage_strategy(), 0..4),
            items in prop::collection::vec(item_usage_strategy(), 0..6),
        ) {
            let first = aggregate_product(&recipes, &items).unwrap();
            let second = aggregate_product(&recipes, &items).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
