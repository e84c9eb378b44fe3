//! Authentication service for owner registration, login and session lookup

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use shared::api::{
    AuthResponse, LoginRequest, MeResponse, OrganizationSummary, RegisterOwnerRequest,
    SessionUser,
};
use shared::EmployeeRole;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Employee ID
    pub org_id: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Employee row joined with its organization
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    org_id: Uuid,
    email: String,
    password_hash: String,
    full_name: String,
    role: String,
    active: bool,
    org_name: String,
}

impl SessionRow {
    fn role(&self) -> AppResult<EmployeeRole> {
        self.role
            .parse()
            .map_err(|_| AppError::Internal(format!("Unknown role '{}' stored", self.role)))
    }

    fn into_session(self, role: EmployeeRole) -> (SessionUser, OrganizationSummary) {
        (
            SessionUser {
                id: self.id,
                email: self.email,
                full_name: self.full_name,
                role,
            },
            OrganizationSummary {
                id: self.org_id,
                name: self.org_name,
            },
        )
    }
}

/// Sign an access token for `user_id`; returns the token and its expiry
pub fn issue_token(
    user_id: Uuid,
    org_id: Uuid,
    role: EmployeeRole,
    secret: &str,
    expiry_secs: i64,
) -> AppResult<(String, DateTime<Utc>)> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiry_secs);

    let claims = Claims {
        sub: user_id.to_string(),
        org_id: org_id.to_string(),
        role: role.as_str().to_string(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    Ok((token, exp))
}

/// Normalize an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
        }
    }

    /// Create an organization together with its owner account
    pub async fn register_owner(&self, input: RegisterOwnerRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&input.email);

        let existing =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE email = $1")
                .bind(&email)
                .fetch_one(&self.db)
                .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let mut tx = self.db.begin().await?;

        let org_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO organizations (name) VALUES ($1) RETURNING id",
        )
        .bind(input.organization_name.trim())
        .fetch_one(&mut *tx)
        .await?;

        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO employees (org_id, email, password_hash, full_name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(org_id)
        .bind(&email)
        .bind(&password_hash)
        .bind(input.full_name.trim())
        .bind(EmployeeRole::Owner.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(%org_id, %user_id, "Registered organization owner");

        let (token, _) = issue_token(
            user_id,
            org_id,
            EmployeeRole::Owner,
            &self.jwt_secret,
            self.access_token_expiry,
        )?;

        Ok(AuthResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
            user: SessionUser {
                id: user_id,
                email,
                full_name: input.full_name.trim().to_string(),
                role: EmployeeRole::Owner,
            },
            organization: OrganizationSummary {
                id: org_id,
                name: input.organization_name.trim().to_string(),
            },
        })
    }

    /// Authenticate an employee with email and password
    pub async fn login(&self, input: LoginRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&input.email);

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT e.id, e.org_id, e.email, e.password_hash, e.full_name, e.role, e.active,
                   o.name AS org_name
            FROM employees e
            JOIN organizations o ON o.id = e.org_id
            WHERE e.email = $1
            "#,
        )
        .bind(&email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        if !row.active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        let valid = verify(&input.password, &row.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let role = row.role()?;
        let (token, _) = issue_token(
            row.id,
            row.org_id,
            role,
            &self.jwt_secret,
            self.access_token_expiry,
        )?;

        tracing::info!(user_id = %row.id, "Employee logged in");

        let (user, organization) = row.into_session(role);
        Ok(AuthResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
            user,
            organization,
        })
    }

    /// Current session's employee and organization
    pub async fn me(&self, user_id: Uuid, org_id: Uuid) -> AppResult<MeResponse> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT e.id, e.org_id, e.email, e.password_hash, e.full_name, e.role, e.active,
                   o.name AS org_name
            FROM employees e
            JOIN organizations o ON o.id = e.org_id
            WHERE e.id = $1 AND e.org_id = $2
            "#,
        )
        .bind(user_id)
        .bind(org_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee".to_string()))?;

        if !row.active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        let role = row.role()?;
        let (user, organization) = row.into_session(role);
        Ok(MeResponse { user, organization })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_token_expiry() {
        let (_, exp) =
            issue_token(Uuid::new_v4(), Uuid::new_v4(), EmployeeRole::Staff, "s", 60).unwrap();
        let remaining = exp - Utc::now();
        assert!(remaining.num_seconds() <= 60);
        assert!(remaining.num_seconds() >= 58);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Chef@Bistro.COM "), "chef@bistro.com");
    }
}
