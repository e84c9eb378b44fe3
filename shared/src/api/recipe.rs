//! Recipe payloads

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{
    field_error, validate_name_field, validate_non_negative_field, validate_positive_field,
    validate_waste_pct_field,
};
use crate::costing::{IngredientCost, RecipeCostResult, ResolvedIngredient};
use crate::models::Recipe;
use crate::validation;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecipeIngredientInput {
    pub item_id: Uuid,
    #[validate(custom = "validate_non_negative_field")]
    pub qty_g: Decimal,
    #[serde(default)]
    #[validate(custom = "validate_waste_pct_field")]
    pub waste_pct: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_ingredient_set"))]
pub struct CreateRecipeRequest {
    #[validate(custom = "validate_name_field")]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom = "validate_positive_field")]
    pub yield_qty_g: Decimal,
    #[validate]
    pub ingredients: Vec<RecipeIngredientInput>,
}

fn validate_ingredient_set(request: &CreateRecipeRequest) -> Result<(), ValidationError> {
    validation::validate_recipe_composition(request.ingredients.len())
        .map_err(|m| field_error("ingredients", m))?;
    let ids: Vec<Uuid> = request.ingredients.iter().map(|i| i.item_id).collect();
    validation::validate_unique_references(&ids).map_err(|m| field_error("ingredients", m))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateRecipeRequest {
    #[validate(custom = "validate_name_field")]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom = "validate_positive_field")]
    pub yield_qty_g: Option<Decimal>,
}

/// Body of the idempotent (recipe, item) upsert
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertRecipeItemRequest {
    #[validate(custom = "validate_non_negative_field")]
    pub qty_g: Decimal,
    #[serde(default)]
    #[validate(custom = "validate_waste_pct_field")]
    pub waste_pct: Decimal,
}

/// Recipe with its derived costs and ingredient breakdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeDetail {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub yield_qty_g: Decimal,
    pub ingredients_count: usize,
    pub total_recipe_cost: Decimal,
    pub recipe_cost_per_gram: Decimal,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items: Vec<IngredientCost>,
}

impl RecipeDetail {
    pub fn new(recipe: &Recipe, cost: RecipeCostResult) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            yield_qty_g: recipe.yield_qty_g,
            ingredients_count: cost.ingredients.len(),
            total_recipe_cost: cost.total_recipe_cost,
            recipe_cost_per_gram: cost.recipe_cost_per_gram,
            created_by: recipe.created_by,
            created_at: recipe.created_at,
            updated_by: recipe.updated_by,
            updated_at: recipe.updated_at,
            items: cost.ingredients,
        }
    }
}

/// Unsaved recipe priced in the browser before it is submitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCostDraft {
    pub yield_qty_g: Decimal,
    pub ingredients: Vec<ResolvedIngredient>,
}
