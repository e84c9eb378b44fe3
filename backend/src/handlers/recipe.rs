//! Recipe handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::api::{
    CreateRecipeRequest, RecipeDetail, UpdateRecipeRequest, UpsertRecipeItemRequest,
};
use shared::IngredientCost;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::{CostingService, RecipeService};
use crate::AppState;

/// List recipes with their current totals
pub async fn list_recipes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<RecipeDetail>>> {
    let service = CostingService::new(state.db.clone());
    Ok(Json(service.list_recipes(user.org_id).await?))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
) -> AppResult<Json<RecipeDetail>> {
    let service = CostingService::new(state.db.clone());
    Ok(Json(service.get_recipe(user.org_id, recipe_id).await?))
}

pub async fn create_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateRecipeRequest>,
) -> AppResult<(StatusCode, Json<RecipeDetail>)> {
    body.validate()?;

    let service = RecipeService::new(state.db.clone());
    let recipe = service.create_recipe(user.org_id, user.user_id, body).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn update_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
    Json(body): Json<UpdateRecipeRequest>,
) -> AppResult<Json<RecipeDetail>> {
    body.validate()?;

    let service = RecipeService::new(state.db.clone());
    let recipe = service
        .update_recipe(user.org_id, user.user_id, recipe_id, body)
        .await?;
    Ok(Json(recipe))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = RecipeService::new(state.db.clone());
    service.delete_recipe(user.org_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ingredient lines with their cost for a full batch
pub async fn list_recipe_items(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(recipe_id): Path<Uuid>,
) -> AppResult<Json<Vec<IngredientCost>>> {
    let service = CostingService::new(state.db.clone());
    let recipe = service.get_recipe(user.org_id, recipe_id).await?;
    Ok(Json(recipe.items))
}

pub async fn upsert_recipe_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((recipe_id, item_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpsertRecipeItemRequest>,
) -> AppResult<Json<RecipeDetail>> {
    body.validate()?;

    let service = RecipeService::new(state.db.clone());
    let recipe = service
        .upsert_item(user.org_id, user.user_id, recipe_id, item_id, body)
        .await?;
    Ok(Json(recipe))
}

pub async fn remove_recipe_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((recipe_id, item_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<RecipeDetail>> {
    let service = RecipeService::new(state.db.clone());
    let recipe = service
        .remove_item(user.org_id, user.user_id, recipe_id, item_id)
        .await?;
    Ok(Json(recipe))
}
