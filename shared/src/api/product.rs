//! Product payloads

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{field_error, validate_name_field, validate_non_negative_field};
use crate::costing::{
    DirectItemInProduct, ProductCostResult, RecipeInProduct, ResolvedItemUsage,
    ResolvedRecipeUsage,
};
use crate::models::Product;
use crate::validation;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductRecipeInput {
    pub recipe_id: Uuid,
    #[validate(custom = "validate_non_negative_field")]
    pub qty_g: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductItemInput {
    pub item_id: Uuid,
    #[validate(custom = "validate_non_negative_field")]
    pub qty_g: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_usage_set"))]
pub struct CreateProductRequest {
    #[validate(custom = "validate_name_field")]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    #[validate]
    pub recipes: Vec<ProductRecipeInput>,
    #[serde(default)]
    #[validate]
    pub items: Vec<ProductItemInput>,
}

fn validate_usage_set(request: &CreateProductRequest) -> Result<(), ValidationError> {
    validation::validate_product_composition(request.recipes.len(), request.items.len())
        .map_err(|m| field_error("composition", m))?;

    let recipe_ids: Vec<Uuid> = request.recipes.iter().map(|r| r.recipe_id).collect();
    validation::validate_unique_references(&recipe_ids).map_err(|m| field_error("recipes", m))?;

    let item_ids: Vec<Uuid> = request.items.iter().map(|i| i.item_id).collect();
    validation::validate_unique_references(&item_ids).map_err(|m| field_error("items", m))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(custom = "validate_name_field")]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Body of the (product, recipe) and (product, item) upserts
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertUsageRequest {
    #[validate(custom = "validate_non_negative_field")]
    pub qty_g: Decimal,
}

/// Product as listed, with its derived totals
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
    pub recipe_count: usize,
    pub item_count: usize,
    pub total_recipes_cost: Decimal,
    pub total_direct_items_cost: Decimal,
    pub total_finished_product_cost: Decimal,
}

impl ProductSummary {
    pub fn new(product: &Product, cost: &ProductCostResult) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            created_by: product.created_by,
            created_at: product.created_at,
            updated_by: product.updated_by,
            updated_at: product.updated_at,
            recipe_count: cost.recipes.len(),
            item_count: cost.direct_items.len(),
            total_recipes_cost: cost.total_recipes_cost,
            total_direct_items_cost: cost.total_direct_items_cost,
            total_finished_product_cost: cost.total_finished_product_cost,
        }
    }
}

/// Product with the full cost breakdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDetail {
    pub id: Uuid,
    pub org_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
    pub total_recipes_cost: Decimal,
    pub total_direct_items_cost: Decimal,
    pub total_finished_product_cost: Decimal,
    pub recipes: Vec<RecipeInProduct>,
    pub direct_items: Vec<DirectItemInProduct>,
}

impl ProductDetail {
    pub fn new(product: &Product, cost: ProductCostResult) -> Self {
        Self {
            id: product.id,
            org_id: product.org_id,
            name: product.name.clone(),
            description: product.description.clone(),
            created_by: product.created_by,
            created_at: product.created_at,
            updated_by: product.updated_by,
            updated_at: product.updated_at,
            total_recipes_cost: cost.total_recipes_cost,
            total_direct_items_cost: cost.total_direct_items_cost,
            total_finished_product_cost: cost.total_finished_product_cost,
            recipes: cost.recipes,
            direct_items: cost.direct_items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecipeLine {
    pub recipe_id: Uuid,
    pub name: String,
    pub qty_g: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductItemLine {
    pub item_id: Uuid,
    pub name: String,
    pub qty_g: Decimal,
    pub unit: Option<String>,
    pub cost_per_base_unit: Decimal,
}

/// Unsaved product priced in the browser before it is submitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCostDraft {
    #[serde(default)]
    pub recipes: Vec<ResolvedRecipeUsage>,
    #[serde(default)]
    pub items: Vec<ResolvedItemUsage>,
}
