//! Employee management service

use bcrypt::{hash, DEFAULT_COST};
use shared::api::{CreateEmployeeRequest, UpdateEmployeeRequest};
use shared::{Employee, EmployeeRole};
use sqlx::PgPool;
use uuid::Uuid;

use super::auth::normalize_email;
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::EmployeeRow;

#[derive(Clone)]
pub struct EmployeeService {
    db: PgPool,
}

/// Only an owner may grant or alter the owner role
fn ensure_can_assign(actor: &AuthUser, role: EmployeeRole) -> AppResult<()> {
    if role == EmployeeRole::Owner && actor.role != EmployeeRole::Owner {
        return Err(AppError::InsufficientPermissions);
    }
    Ok(())
}

impl EmployeeService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_employees(&self, org_id: Uuid) -> AppResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, org_id, email, full_name, role, active, created_at, updated_at
            FROM employees
            WHERE org_id = $1
            ORDER BY full_name ASC
            "#,
        )
        .bind(org_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|row| Employee::try_from(row).map_err(AppError::Internal))
            .collect()
    }

    pub async fn get_employee(&self, org_id: Uuid, employee_id: Uuid) -> AppResult<Employee> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, org_id, email, full_name, role, active, created_at, updated_at
            FROM employees
            WHERE id = $1 AND org_id = $2
            "#,
        )
        .bind(employee_id)
        .bind(org_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee".to_string()))?;

        Employee::try_from(row).map_err(AppError::Internal)
    }

    pub async fn create_employee(
        &self,
        actor: &AuthUser,
        input: CreateEmployeeRequest,
    ) -> AppResult<Employee> {
        ensure_can_assign(actor, input.role)?;

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let employee_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO employees (org_id, email, password_hash, full_name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(actor.org_id)
        .bind(normalize_email(&input.email))
        .bind(&password_hash)
        .bind(input.full_name.trim())
        .bind(input.role.as_str())
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            org_id = %actor.org_id,
            %employee_id,
            role = %input.role,
            "Employee created"
        );
        self.get_employee(actor.org_id, employee_id).await
    }

    pub async fn update_employee(
        &self,
        actor: &AuthUser,
        employee_id: Uuid,
        input: UpdateEmployeeRequest,
    ) -> AppResult<Employee> {
        let current = self.get_employee(actor.org_id, employee_id).await?;
        ensure_can_assign(actor, current.role)?;
        if let Some(role) = input.role {
            ensure_can_assign(actor, role)?;
        }

        sqlx::query(
            r#"
            UPDATE employees
            SET full_name = $3, role = $4, active = $5, updated_at = NOW()
            WHERE id = $1 AND org_id = $2
            "#,
        )
        .bind(employee_id)
        .bind(actor.org_id)
        .bind(input.full_name.as_deref().map(str::trim).unwrap_or(&current.full_name))
        .bind(input.role.unwrap_or(current.role).as_str())
        .bind(input.active.unwrap_or(current.active))
        .execute(&self.db)
        .await?;

        self.get_employee(actor.org_id, employee_id).await
    }

    pub async fn delete_employee(&self, actor: &AuthUser, employee_id: Uuid) -> AppResult<()> {
        if actor.user_id == employee_id {
            return Err(AppError::conflict("employee", "You cannot remove your own account"));
        }

        let current = self.get_employee(actor.org_id, employee_id).await?;
        ensure_can_assign(actor, current.role)?;

        sqlx::query("DELETE FROM employees WHERE id = $1 AND org_id = $2")
            .bind(employee_id)
            .bind(actor.org_id)
            .execute(&self.db)
            .await?;

        tracing::info!(org_id = %actor.org_id, %employee_id, "Employee removed");
        Ok(())
    }
}
