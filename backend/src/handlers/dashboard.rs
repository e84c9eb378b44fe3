//! Dashboard handler

use axum::{extract::State, Json};
use shared::api::DashboardSummary;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::CostingService;
use crate::AppState;

/// Organization-wide counts and average finished product cost
pub async fn get_dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<DashboardSummary>> {
    let service = CostingService::new(state.db.clone());
    Ok(Json(service.dashboard(user.org_id).await?))
}
