//! Authentication middleware
//!
//! Builds the per-request session from the bearer token. The signing secret
//! comes from application state.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use shared::EmployeeRole;
use uuid::Uuid;

use crate::error::{AppError, AppResult, ErrorDetail, ErrorResponse};
use crate::services::auth::Claims;
use crate::AppState;

/// The signed-in employee, as established for one request
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub org_id: Uuid,
    pub role: EmployeeRole,
}

impl AuthUser {
    pub fn from_claims(claims: &Claims) -> AppResult<Self> {
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))?;
        let org_id = Uuid::parse_str(&claims.org_id)
            .map_err(|_| AppError::Unauthorized("Invalid organization ID in token".to_string()))?;
        let role = claims
            .role
            .parse::<EmployeeRole>()
            .map_err(|_| AppError::Unauthorized("Invalid role in token".to_string()))?;

        Ok(Self {
            user_id,
            org_id,
            role,
        })
    }

    /// Owners and managers may add, edit and remove employees
    pub fn require_employee_manager(&self) -> AppResult<()> {
        if self.role.can_manage_employees() {
            Ok(())
        } else {
            Err(AppError::InsufficientPermissions)
        }
    }
}

/// Validates the bearer token and attaches an [`AuthUser`] to the request
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => token,
        None => {
            return AppError::Unauthorized("Missing or invalid Authorization header".to_string())
                .into_response();
        }
    };

    let auth_user = match decode_session(token, &state.config.jwt.secret) {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    tracing::debug!(
        user_id = %auth_user.user_id,
        org_id = %auth_user.org_id,
        "Session established"
    );
    request.extensions_mut().insert(auth_user);

    next.run(request).await
}

/// Decode and validate a session token
pub fn decode_session(token: &str, secret: &str) -> AppResult<AuthUser> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

    AuthUser::from_claims(&claims)
}

/// Extractor for authenticated user
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: ErrorDetail::new("UNAUTHORIZED", "Authentication required"),
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}
