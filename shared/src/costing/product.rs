//! Product cost aggregation

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    aggregate_recipe, checked_div, checked_mul, checked_sum, compute_item_cost_per_base_unit,
    ensure_non_negative, resolve_ingredients, CostSnapshot, CostSource, CostingError,
    CostingResult, ResolvedIngredient,
};
use crate::models::{Product, ProductItemUsage, ProductRecipeUsage};

/// A recipe usage with the recipe and its ingredients already resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedRecipeUsage {
    pub recipe_id: Uuid,
    pub name: String,
    pub qty_g_in_product: Decimal,
    pub yield_qty_g: Decimal,
    pub ingredients: Vec<ResolvedIngredient>,
}

/// A direct item usage with the item cost already resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedItemUsage {
    pub item_id: Uuid,
    pub name: String,
    pub qty_g: Decimal,
    pub cost_per_base_unit: Decimal,
}

/// Share of one recipe ingredient attributed to the product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeItemInProduct {
    pub item_id: Uuid,
    pub item_name: String,
    pub qty_g_in_recipe: Decimal,
    pub waste_pct: Decimal,
    pub cost_per_base_unit: Decimal,
    pub cost_in_full_recipe: Decimal,
    pub cost_in_product: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeInProduct {
    pub recipe_id: Uuid,
    pub name: String,
    pub qty_g_in_product: Decimal,
    pub yield_qty_g: Decimal,
    pub total_recipe_cost: Decimal,
    pub recipe_cost_per_gram: Decimal,
    pub cost_for_recipe_in_product: Decimal,
    pub items: Vec<RecipeItemInProduct>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectItemInProduct {
    pub item_id: Uuid,
    pub name: String,
    pub qty_g: Decimal,
    pub cost_per_base_unit: Decimal,
    pub cost_for_item_in_product: Decimal,
}

/// Totals and full breakdown of one product unit, with no identity attached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductCost {
    pub total_recipes_cost: Decimal,
    pub total_direct_items_cost: Decimal,
    pub total_finished_product_cost: Decimal,
    pub recipes: Vec<RecipeInProduct>,
    pub direct_items: Vec<DirectItemInProduct>,
}

/// Cost of a stored product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductCostResult {
    pub product_id: Uuid,
    pub name: String,
    pub total_recipes_cost: Decimal,
    pub total_direct_items_cost: Decimal,
    pub total_finished_product_cost: Decimal,
    pub recipes: Vec<RecipeInProduct>,
    pub direct_items: Vec<DirectItemInProduct>,
}

fn cost_recipe_usage(idx: usize, usage: &ResolvedRecipeUsage) -> CostingResult<RecipeInProduct> {
    ensure_non_negative(usage.qty_g_in_product, format!("recipes[{}].qty_g", idx))?;

    let recipe_cost = aggregate_recipe(usage.yield_qty_g, &usage.ingredients)?;
    let cost_for_recipe_in_product = checked_mul(
        usage.qty_g_in_product,
        recipe_cost.recipe_cost_per_gram,
        "cost_for_recipe_in_product",
    )?;

    // yield is known positive once aggregate_recipe succeeded
    let mut items = recipe_cost
        .ingredients
        .into_iter()
        .map(|line| {
            let scaled = checked_mul(line.line_cost, usage.qty_g_in_product, "cost_in_product")?;
            Ok(RecipeItemInProduct {
                cost_in_product: checked_div(scaled, usage.yield_qty_g, "cost_in_product")?,
                item_id: line.item_id,
                item_name: line.item_name,
                qty_g_in_recipe: line.qty_g,
                waste_pct: line.waste_pct,
                cost_per_base_unit: line.cost_per_base_unit,
                cost_in_full_recipe: line.line_cost,
            })
        })
        .collect::<CostingResult<Vec<_>>>()?;
    settle_rounding(&mut items, cost_for_recipe_in_product)?;

    Ok(RecipeInProduct {
        recipe_id: usage.recipe_id,
        name: usage.name.clone(),
        qty_g_in_product: usage.qty_g_in_product,
        yield_qty_g: recipe_cost.yield_qty_g,
        total_recipe_cost: recipe_cost.total_recipe_cost,
        recipe_cost_per_gram: recipe_cost.recipe_cost_per_gram,
        cost_for_recipe_in_product,
        items,
    })
}

/// Decimal places kept on each ingredient share of a recipe in a product
const SHARE_SCALE: u32 = 12;

/// Make the ingredient shares add up to exactly `parent`
///
/// Shares are truncated to [`SHARE_SCALE`] and the largest one absorbs the
/// difference, so every partial sum of the shares stays exact whatever order
/// they are added in.
fn settle_rounding(items: &mut [RecipeItemInProduct], parent: Decimal) -> CostingResult<()> {
    let largest = match items
        .iter()
        .enumerate()
        .max_by_key(|(_, item)| item.cost_in_product)
    {
        Some((idx, _)) => idx,
        None => return Ok(()),
    };

    for (idx, item) in items.iter_mut().enumerate() {
        if idx != largest {
            item.cost_in_product = item
                .cost_in_product
                .round_dp_with_strategy(SHARE_SCALE, RoundingStrategy::ToZero);
        }
    }

    let others = checked_sum(
        items
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != largest)
            .map(|(_, item)| item.cost_in_product),
        "cost_in_product",
    )?;
    items[largest].cost_in_product = parent.checked_sub(others).ok_or(CostingError::Overflow {
        operation: "cost_in_product",
    })?;
    Ok(())
}

fn cost_item_usage(idx: usize, usage: &ResolvedItemUsage) -> CostingResult<DirectItemInProduct> {
    ensure_non_negative(usage.qty_g, format!("items[{}].qty_g", idx))?;
    ensure_non_negative(
        usage.cost_per_base_unit,
        format!("items[{}].cost_per_base_unit", idx),
    )?;

    Ok(DirectItemInProduct {
        item_id: usage.item_id,
        name: usage.name.clone(),
        qty_g: usage.qty_g,
        cost_per_base_unit: usage.cost_per_base_unit,
        cost_for_item_in_product: checked_mul(
            usage.qty_g,
            usage.cost_per_base_unit,
            "cost_for_item_in_product",
        )?,
    })
}

/// Roll recipe usages and direct item usages up into product totals
///
/// Does not require at least one usage; run
/// [`validate_product_composition`](crate::validation::validate_product_composition)
/// before calling this for a product being created.
pub fn aggregate_product(
    recipe_usages: &[ResolvedRecipeUsage],
    item_usages: &[ResolvedItemUsage],
) -> CostingResult<ProductCost> {
    let recipes = recipe_usages
        .iter()
        .enumerate()
        .map(|(idx, usage)| cost_recipe_usage(idx, usage))
        .collect::<CostingResult<Vec<_>>>()?;

    let direct_items = item_usages
        .iter()
        .enumerate()
        .map(|(idx, usage)| cost_item_usage(idx, usage))
        .collect::<CostingResult<Vec<_>>>()?;

    let total_recipes_cost = checked_sum(
        recipes.iter().map(|r| r.cost_for_recipe_in_product),
        "total_recipes_cost",
    )?;
    let total_direct_items_cost = checked_sum(
        direct_items.iter().map(|i| i.cost_for_item_in_product),
        "total_direct_items_cost",
    )?;
    let total_finished_product_cost = total_recipes_cost
        .checked_add(total_direct_items_cost)
        .ok_or(CostingError::Overflow {
            operation: "total_finished_product_cost",
        })?;

    Ok(ProductCost {
        total_recipes_cost,
        total_direct_items_cost,
        total_finished_product_cost,
        recipes,
        direct_items,
    })
}

/// Resolve recipe usages (recipe plus its current ingredient lines)
pub fn resolve_recipe_usages<S: CostSource + ?Sized>(
    product_id: Uuid,
    usages: &[ProductRecipeUsage],
    source: &S,
) -> CostingResult<Vec<ResolvedRecipeUsage>> {
    usages
        .iter()
        .enumerate()
        .map(|(idx, usage)| {
            if usage.product_id != product_id {
                return Err(CostingError::validation(
                    format!("recipes[{}].product_id", idx),
                    "usage belongs to a different product",
                ));
            }
            let recipe = source
                .recipe(usage.recipe_id)
                .ok_or_else(|| CostingError::recipe_not_found(usage.recipe_id))?;
            let ingredients =
                resolve_ingredients(recipe.id, source.recipe_lines(recipe.id), source)?;
            Ok(ResolvedRecipeUsage {
                recipe_id: recipe.id,
                name: recipe.name.clone(),
                qty_g_in_product: usage.qty_g_in_product,
                yield_qty_g: recipe.yield_qty_g,
                ingredients,
            })
        })
        .collect()
}

/// Resolve direct item usages against current item costs
pub fn resolve_item_usages<S: CostSource + ?Sized>(
    product_id: Uuid,
    usages: &[ProductItemUsage],
    source: &S,
) -> CostingResult<Vec<ResolvedItemUsage>> {
    usages
        .iter()
        .enumerate()
        .map(|(idx, usage)| {
            if usage.product_id != product_id {
                return Err(CostingError::validation(
                    format!("items[{}].product_id", idx),
                    "usage belongs to a different product",
                ));
            }
            let item = source
                .item(usage.item_id)
                .ok_or_else(|| CostingError::item_not_found(usage.item_id))?;
            Ok(ResolvedItemUsage {
                item_id: item.id,
                name: item.name.clone(),
                qty_g: usage.qty_g,
                cost_per_base_unit: compute_item_cost_per_base_unit(item)?,
            })
        })
        .collect()
}

/// Cost of `product` from its usages and the current recipe and item data
pub fn compute_product_cost<S: CostSource + ?Sized>(
    product: &Product,
    recipe_usages: &[ProductRecipeUsage],
    item_usages: &[ProductItemUsage],
    source: &S,
) -> CostingResult<ProductCostResult> {
    let recipes = resolve_recipe_usages(product.id, recipe_usages, source)?;
    let items = resolve_item_usages(product.id, item_usages, source)?;
    let cost = aggregate_product(&recipes, &items)?;

    Ok(ProductCostResult {
        product_id: product.id,
        name: product.name.clone(),
        total_recipes_cost: cost.total_recipes_cost,
        total_direct_items_cost: cost.total_direct_items_cost,
        total_finished_product_cost: cost.total_finished_product_cost,
        recipes: cost.recipes,
        direct_items: cost.direct_items,
    })
}

/// Cost of a product stored in `snapshot`, using its stored usages
pub fn compute_product_cost_by_id(
    product_id: Uuid,
    snapshot: &CostSnapshot,
) -> CostingResult<ProductCostResult> {
    let product = snapshot
        .product(product_id)
        .ok_or_else(|| CostingError::product_not_found(product_id))?;
    compute_product_cost(
        product,
        snapshot.recipe_usages(product_id),
        snapshot.item_usages(product_id),
        snapshot,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costing::test_support::{dec, item, product, recipe};
    use crate::models::RecipeIngredientLine;

    /// Sauce (yield 1000 g): 500 g of A at 0.01, 500 g of B at 0.02.
    /// Burger: 200 g of sauce plus 100 g of C at 0.05.
    fn burger_fixture() -> (
        CostSnapshot,
        Product,
        Vec<ProductRecipeUsage>,
        Vec<ProductItemUsage>,
    ) {
        let a = item("Tomato", "10.00", "1000");
        let b = item("Cream", "20.00", "1000");
        let c = item("Beef", "50.00", "1000");
        let sauce = recipe("Sauce", "1000");
        let burger = product("Burger");

        let lines = vec![
            RecipeIngredientLine {
                recipe_id: sauce.id,
                item_id: a.id,
                qty_g: dec("500"),
                waste_pct: Decimal::ZERO,
            },
            RecipeIngredientLine {
                recipe_id: sauce.id,
                item_id: b.id,
                qty_g: dec("500"),
                waste_pct: dec("10"),
            },
        ];
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

        (snapshot, burger, recipe_usages, item_usages)
    }

    #[test]
    fn test_burger_totals() {
        let (snapshot, burger, recipes, items) = burger_fixture();
        let cost = compute_product_cost(&burger, &recipes, &items, &snapshot).unwrap();

        assert_eq!(cost.total_recipes_cost, dec("3.00"));
        assert_eq!(cost.total_direct_items_cost, dec("5.00"));
        assert_eq!(cost.total_finished_product_cost, dec("8.00"));
        assert_eq!(cost.recipes[0].recipe_cost_per_gram, dec("0.015"));
    }

    #[test]
    fn test_breakdown_lines_sum_to_parent() {
        let (snapshot, burger, recipes, items) = burger_fixture();
        let cost = compute_product_cost(&burger, &recipes, &items, &snapshot).unwrap();

        let sauce = &cost.recipes[0];
        let ingredient_sum: Decimal = sauce.items.iter().map(|i| i.cost_in_product).sum();
        assert_eq!(ingredient_sum, sauce.cost_for_recipe_in_product);

        let full_recipe_sum: Decimal = sauce.items.iter().map(|i| i.cost_in_full_recipe).sum();
        assert_eq!(full_recipe_sum, sauce.total_recipe_cost);

        let direct_sum: Decimal = cost
            .direct_items
            .iter()
            .map(|i| i.cost_for_item_in_product)
            .sum();
        assert_eq!(direct_sum, cost.total_direct_items_cost);
    }

    #[test]
    fn test_recomputation_is_identical() {
        let (snapshot, burger, recipes, items) = burger_fixture();
        let first = compute_product_cost(&burger, &recipes, &items, &snapshot).unwrap();
        let second = compute_product_cost(&burger, &recipes, &items, &snapshot).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_yield_recipe_propagates_division_error() {
        let broken = ResolvedRecipeUsage {
            recipe_id: Uuid::new_v4(),
            name: "Broken".to_string(),
            qty_g_in_product: dec("50"),
            yield_qty_g: Decimal::ZERO,
            ingredients: vec![],
        };
        let err = aggregate_product(&[broken], &[]).unwrap_err();
        assert_eq!(err, CostingError::DivisionByZero { field: "yield_qty_g" });
    }

    #[test]
    fn test_missing_recipe_is_not_found() {
        let burger = product("Burger");
        let ghost = Uuid::new_v4();
        let usages = vec![ProductRecipeUsage {
            product_id: burger.id,
            recipe_id: ghost,
            qty_g_in_product: dec("10"),
        }];
        let err = compute_product_cost(&burger, &usages, &[], &CostSnapshot::new()).unwrap_err();
        assert_eq!(err, CostingError::recipe_not_found(ghost));
    }

    #[test]
    fn test_missing_direct_item_is_not_found() {
        let burger = product("Burger");
        let ghost = Uuid::new_v4();
        let usages = vec![ProductItemUsage {
            product_id: burger.id,
            item_id: ghost,
            qty_g: dec("10"),
        }];
        let err = compute_product_cost(&burger, &[], &usages, &CostSnapshot::new()).unwrap_err();
        assert_eq!(err, CostingError::item_not_found(ghost));
    }

    #[test]
    fn test_negative_usage_rejected() {
        let usage = ResolvedItemUsage {
            item_id: Uuid::new_v4(),
            name: "Cheese".to_string(),
            qty_g: dec("-5"),
            cost_per_base_unit: dec("0.02"),
        };
        assert!(matches!(
            aggregate_product(&[], &[usage]),
            Err(CostingError::Validation { .. })
        ));
    }

    #[test]
    fn test_direct_items_only_product() {
        let usage = ResolvedItemUsage {
            item_id: Uuid::new_v4(),
            name: "Soda can".to_string(),
            qty_g: dec("1"),
            cost_per_base_unit: dec("0.45"),
        };
        let cost = aggregate_product(&[], &[usage]).unwrap();
        assert_eq!(cost.total_recipes_cost, Decimal::ZERO);
        assert_eq!(cost.total_finished_product_cost, dec("0.45"));
    }

    #[test]
    fn test_usage_of_other_product_rejected() {
        let (snapshot, _burger, recipes, items) = burger_fixture();
        let other = product("Salad");
        assert!(matches!(
            compute_product_cost(&other, &recipes, &items, &snapshot),
            Err(CostingError::Validation { .. })
        ));
    }

    #[test]
    fn test_compute_by_id_reads_stored_usages() {
        let (mut snapshot, burger, recipes, items) = burger_fixture();
        for usage in recipes {
            snapshot.insert_recipe_usage(usage);
        }
        for usage in items {
            snapshot.insert_item_usage(usage);
        }
        snapshot.insert_product(burger.clone());

        let cost = compute_product_cost_by_id(burger.id, &snapshot).unwrap();
        assert_eq!(cost.total_finished_product_cost, dec("8.00"));
        assert_eq!(cost.name, "Burger");
    }

    #[test]
    fn test_unknown_product_is_not_found() {
        let missing = Uuid::new_v4();
        assert_eq!(
            compute_product_cost_by_id(missing, &CostSnapshot::new()).unwrap_err(),
            CostingError::product_not_found(missing)
        );
    }

    fn share(name: &str, qty: &str, cpbu: &str) -> ResolvedIngredient {
        ResolvedIngredient {
            item_id: Uuid::new_v4(),
            item_name: name.to_string(),
            qty_g: dec(qty),
            waste_pct: Decimal::ZERO,
            cost_per_base_unit: dec(cpbu),
        }
    }

    #[test]
    fn test_shares_add_up_when_yield_does_not_divide() {
        let usage = ResolvedRecipeUsage {
            recipe_id: Uuid::new_v4(),
            name: "Vinaigrette".to_string(),
            qty_g_in_product: dec("1"),
            yield_qty_g: dec("3"),
            ingredients: vec![share("Oil", "50", "0.01"), share("Vinegar", "50", "0.01")],
        };
        let cost = aggregate_product(&[usage], &[]).unwrap();

        let dressing = &cost.recipes[0];
        let shares: Decimal = dressing.items.iter().map(|i| i.cost_in_product).sum();
        assert_eq!(shares, dressing.cost_for_recipe_in_product);
        assert_eq!(
            dressing.cost_for_recipe_in_product,
            dec("1") * dressing.recipe_cost_per_gram
        );
    }

    #[test]
    fn test_shares_add_up_across_odd_yields() {
        for yield_g in ["7", "11", "13", "997"] {
            let usage = ResolvedRecipeUsage {
                recipe_id: Uuid::new_v4(),
                name: "Stock".to_string(),
                qty_g_in_product: dec("3"),
                yield_qty_g: dec(yield_g),
                ingredients: vec![
                    share("Bones", "400", "0.0031"),
                    share("Carrot", "120", "0.0017"),
                    share("Onion", "90", "0.0023"),
                ],
            };
            let cost = aggregate_product(&[usage], &[]).unwrap();
            let stock = &cost.recipes[0];
            let shares: Decimal = stock.items.iter().map(|i| i.cost_in_product).sum();
            assert_eq!(shares, stock.cost_for_recipe_in_product, "yield {}", yield_g);
        }
    }
}
