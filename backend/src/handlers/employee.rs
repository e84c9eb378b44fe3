//! Employee handlers
//!
//! Any member may list employees; changes require an owner or manager.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::api::{CreateEmployeeRequest, UpdateEmployeeRequest};
use shared::Employee;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::EmployeeService;
use crate::AppState;

pub async fn list_employees(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<Employee>>> {
    let service = EmployeeService::new(state.db.clone());
    Ok(Json(service.list_employees(user.org_id).await?))
}

pub async fn get_employee(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<Employee>> {
    let service = EmployeeService::new(state.db.clone());
    Ok(Json(service.get_employee(user.org_id, employee_id).await?))
}

pub async fn create_employee(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateEmployeeRequest>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    user.require_employee_manager()?;
    body.validate()?;

    let service = EmployeeService::new(state.db.clone());
    let employee = service.create_employee(&user, body).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn update_employee(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(employee_id): Path<Uuid>,
    Json(body): Json<UpdateEmployeeRequest>,
) -> AppResult<Json<Employee>> {
    user.require_employee_manager()?;
    body.validate()?;

    let service = EmployeeService::new(state.db.clone());
    Ok(Json(service.update_employee(&user, employee_id, body).await?))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(employee_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    user.require_employee_manager()?;

    let service = EmployeeService::new(state.db.clone());
    service.delete_employee(&user, employee_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
