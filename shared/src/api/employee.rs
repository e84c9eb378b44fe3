//! Employee payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{validate_name_field, validate_password_field};
use crate::types::EmployeeRole;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[validate(email)]
    pub email: String,
    #[validate(custom = "validate_name_field")]
    pub full_name: String,
    /// Plain-text initial password; only its bcrypt hash is stored
    #[serde(alias = "password_hash")]
    #[validate(custom = "validate_password_field")]
    pub password: String,
    #[serde(default)]
    pub role: EmployeeRole,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateEmployeeRequest {
    #[validate(custom = "validate_name_field")]
    pub full_name: Option<String>,
    pub role: Option<EmployeeRole>,
    pub active: Option<bool>,
}
