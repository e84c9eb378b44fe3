//! Recipe cost aggregation

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    checked_div, checked_mul, checked_sum, compute_item_cost_per_base_unit,
    ensure_non_negative, ensure_waste_pct, CostSource, CostingError, CostingResult,
};
use crate::models::{Recipe, RecipeIngredientLine};

/// An ingredient line with its item cost already looked up
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedIngredient {
    pub item_id: Uuid,
    pub item_name: String,
    pub qty_g: Decimal,
    #[serde(default)]
    pub waste_pct: Decimal,
    pub cost_per_base_unit: Decimal,
}

/// Cost of one ingredient line for a full batch of the recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientCost {
    pub item_id: Uuid,
    pub item_name: String,
    pub qty_g: Decimal,
    pub waste_pct: Decimal,
    pub cost_per_base_unit: Decimal,
    pub line_cost: Decimal,
}

/// Cost of a recipe batch, with no identity attached (drafts use this)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeCost {
    pub yield_qty_g: Decimal,
    pub total_recipe_cost: Decimal,
    pub recipe_cost_per_gram: Decimal,
    pub ingredients: Vec<IngredientCost>,
}

/// Cost of a stored recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeCostResult {
    pub recipe_id: Uuid,
    pub name: String,
    pub yield_qty_g: Decimal,
    pub total_recipe_cost: Decimal,
    pub recipe_cost_per_gram: Decimal,
    pub ingredients: Vec<IngredientCost>,
}

/// Sum `qty_g x cost_per_base_unit` over `ingredients` and divide by yield
///
/// Waste percentage is validated and carried through to the breakdown but
/// does not change the cost.
pub fn aggregate_recipe(
    yield_qty_g: Decimal,
    ingredients: &[ResolvedIngredient],
) -> CostingResult<RecipeCost> {
    if yield_qty_g <= Decimal::ZERO {
        return Err(CostingError::DivisionByZero {
            field: "yield_qty_g",
        });
    }

    let mut lines = Vec::with_capacity(ingredients.len());
    for (idx, ingredient) in ingredients.iter().enumerate() {
        ensure_non_negative(ingredient.qty_g, format!("ingredients[{}].qty_g", idx))?;
        ensure_waste_pct(ingredient.waste_pct, format!("ingredients[{}].waste_pct", idx))?;
        ensure_non_negative(
            ingredient.cost_per_base_unit,
            format!("ingredients[{}].cost_per_base_unit", idx),
        )?;

        let line_cost = checked_mul(
            ingredient.qty_g,
            ingredient.cost_per_base_unit,
            "ingredient line cost",
        )?;

        lines.push(IngredientCost {
            item_id: ingredient.item_id,
            item_name: ingredient.item_name.clone(),
            qty_g: ingredient.qty_g,
            waste_pct: ingredient.waste_pct,
            cost_per_base_unit: ingredient.cost_per_base_unit,
            line_cost,
        });
    }

    let total_recipe_cost = checked_sum(lines.iter().map(|l| l.line_cost), "total_recipe_cost")?;
    let recipe_cost_per_gram = checked_div(total_recipe_cost, yield_qty_g, "recipe_cost_per_gram")?;

    Ok(RecipeCost {
        yield_qty_g,
        total_recipe_cost,
        recipe_cost_per_gram,
        ingredients: lines,
    })
}

/// Resolve each line's item through `source` using its current cost
pub fn resolve_ingredients<S: CostSource + ?Sized>(
    recipe_id: Uuid,
    lines: &[RecipeIngredientLine],
    source: &S,
) -> CostingResult<Vec<ResolvedIngredient>> {
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            if line.recipe_id != recipe_id {
                return Err(CostingError::validation(
                    format!("ingredients[{}].recipe_id", idx),
                    "line belongs to a different recipe",
                ));
            }
            let item = source
                .item(line.item_id)
                .ok_or_else(|| CostingError::item_not_found(line.item_id))?;
            Ok(ResolvedIngredient {
                item_id: item.id,
                item_name: item.name.clone(),
                qty_g: line.qty_g,
                waste_pct: line.waste_pct,
                cost_per_base_unit: compute_item_cost_per_base_unit(item)?,
            })
        })
        .collect()
}

/// Cost of `recipe` from the given ingredient lines and current item costs
pub fn compute_recipe_cost<S: CostSource + ?Sized>(
    recipe: &Recipe,
    lines: &[RecipeIngredientLine],
    source: &S,
) -> CostingResult<RecipeCostResult> {
    let resolved = resolve_ingredients(recipe.id, lines, source)?;
    let cost = aggregate_recipe(recipe.yield_qty_g, &resolved)?;

    Ok(RecipeCostResult {
        recipe_id: recipe.id,
        name: recipe.name.clone(),
        yield_qty_g: cost.yield_qty_g,
        total_recipe_cost: cost.total_recipe_cost,
        recipe_cost_per_gram: cost.recipe_cost_per_gram,
        ingredients: cost.ingredients,
    })
}

/// Cost of a recipe stored in `source`, using its stored ingredient lines
pub fn compute_recipe_cost_by_id<S: CostSource + ?Sized>(
    recipe_id: Uuid,
    source: &S,
) -> CostingResult<RecipeCostResult> {
    let recipe = source
        .recipe(recipe_id)
        .ok_or_else(|| CostingError::recipe_not_found(recipe_id))?;
    compute_recipe_cost(recipe, source.recipe_lines(recipe_id), source)
}
