//! Product handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::api::{
    CreateProductRequest, ProductDetail, ProductItemLine, ProductRecipeLine, ProductSummary,
    UpdateProductRequest, UpsertUsageRequest,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::{CostingService, ProductService};
use crate::AppState;

/// List products with their current totals
pub async fn list_products(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<ProductSummary>>> {
    let service = CostingService::new(state.db.clone());
    Ok(Json(service.list_products(user.org_id).await?))
}

/// Product with the full cost breakdown
pub async fn get_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ProductDetail>> {
    let service = CostingService::new(state.db.clone());
    Ok(Json(service.get_product(user.org_id, product_id).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ProductDetail>)> {
    body.validate()?;

    let service = ProductService::new(state.db.clone());
    let product = service.create_product(user.org_id, user.user_id, body).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(body): Json<UpdateProductRequest>,
) -> AppResult<Json<ProductDetail>> {
    body.validate()?;

    let service = ProductService::new(state.db.clone());
    let product = service
        .update_product(user.org_id, user.user_id, product_id, body)
        .await?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = ProductService::new(state.db.clone());
    service.delete_product(user.org_id, product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_product_recipes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<ProductRecipeLine>>> {
    let service = ProductService::new(state.db.clone());
    Ok(Json(service.list_recipe_lines(user.org_id, product_id).await?))
}

pub async fn upsert_product_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((product_id, recipe_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpsertUsageRequest>,
) -> AppResult<Json<ProductDetail>> {
    body.validate()?;

    let service = ProductService::new(state.db.clone());
    let product = service
        .upsert_recipe(user.org_id, user.user_id, product_id, recipe_id, body)
        .await?;
    Ok(Json(product))
}

pub async fn remove_product_recipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((product_id, recipe_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ProductDetail>> {
    let service = ProductService::new(state.db.clone());
    let product = service
        .remove_recipe(user.org_id, user.user_id, product_id, recipe_id)
        .await?;
    Ok(Json(product))
}

pub async fn list_product_items(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<ProductItemLine>>> {
    let service = ProductService::new(state.db.clone());
    Ok(Json(service.list_item_lines(user.org_id, product_id).await?))
}

pub async fn upsert_product_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((product_id, item_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpsertUsageRequest>,
) -> AppResult<Json<ProductDetail>> {
    body.validate()?;

    let service = ProductService::new(state.db.clone());
    let product = service
        .upsert_item(user.org_id, user.user_id, product_id, item_id, body)
        .await?;
    Ok(Json(product))
}

pub async fn remove_product_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((product_id, item_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ProductDetail>> {
    let service = ProductService::new(state.db.clone());
    let product = service
        .remove_item(user.org_id, user.user_id, product_id, item_id)
        .await?;
    Ok(Json(product))
}
