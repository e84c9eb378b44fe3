//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use shared::api::{AuthResponse, LoginRequest, MeResponse, RegisterOwnerRequest};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::AuthService;
use crate::AppState;

/// Register an organization and its owner
pub async fn register_owner(
    State(state): State<AppState>,
    Json(body): Json<RegisterOwnerRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    body.validate()?;

    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let response = auth_service.register_owner(body).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    body.validate()?;

    let auth_service = AuthService::new(state.db.clone(), &state.config);
    Ok(Json(auth_service.login(body).await?))
}

/// The signed-in employee and organization
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<MeResponse>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    Ok(Json(auth_service.me(user.user_id, user.org_id).await?))
}
