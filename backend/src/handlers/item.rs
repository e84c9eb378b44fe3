//! Item, unit and category handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::api::{CreateCategoryRequest, CreateItemRequest, ItemDetail, UpdateItemRequest};
use shared::{Category, Unit};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::ItemService;
use crate::AppState;

pub async fn list_units(State(state): State<AppState>) -> AppResult<Json<Vec<Unit>>> {
    let service = ItemService::new(state.db.clone());
    Ok(Json(service.list_units().await?))
}

pub async fn list_categories(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Category>>> {
    let service = ItemService::new(state.db.clone());
    Ok(Json(service.list_categories(user.org_id).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    body.validate()?;

    let service = ItemService::new(state.db.clone());
    let category = service.create_category(user.org_id, body).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// List items with their current cost per base unit
pub async fn list_items(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<ItemDetail>>> {
    let service = ItemService::new(state.db.clone());
    Ok(Json(service.list_items(user.org_id).await?))
}

pub async fn get_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ItemDetail>> {
    let service = ItemService::new(state.db.clone());
    Ok(Json(service.get_item(user.org_id, item_id).await?))
}

pub async fn create_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<ItemDetail>)> {
    body.validate()?;

    let service = ItemService::new(state.db.clone());
    let item = service.create_item(user.org_id, body).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(body): Json<UpdateItemRequest>,
) -> AppResult<Json<ItemDetail>> {
    body.validate()?;

    let service = ItemService::new(state.db.clone());
    Ok(Json(service.update_item(user.org_id, item_id, body).await?))
}

pub async fn delete_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = ItemService::new(state.db.clone());
    service.delete_item(user.org_id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
