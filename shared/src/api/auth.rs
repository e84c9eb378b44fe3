//! Authentication payloads
//!
//! Field names are camelCase, matching what the web client already sends.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{validate_name_field, validate_password_field};
use crate::types::EmployeeRole;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterOwnerRequest {
    #[validate(email)]
    pub email: String,
    #[validate(custom = "validate_password_field")]
    pub password: String,
    #[validate(custom = "validate_name_field")]
    pub full_name: String,
    #[validate(custom = "validate_name_field")]
    pub organization_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// The signed-in member, as seen by the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: EmployeeRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationSummary {
    pub id: Uuid,
    pub name: String,
}

/// Returned by login and owner registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: SessionUser,
    pub organization: OrganizationSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: SessionUser,
    pub organization: OrganizationSummary,
}
