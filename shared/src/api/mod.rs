//! Request and response payloads of the HTTP API
//!
//! Every endpoint has an explicit type here. Requests derive
//! [`validator::Validate`] and are checked at the HTTP boundary before any
//! service code runs.

mod auth;
mod dashboard;
mod employee;
mod item;
mod product;
mod recipe;

pub use auth::*;
pub use dashboard::*;
pub use employee::*;
pub use item::*;
pub use product::*;
pub use recipe::*;

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::validation;

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_non_negative_field(value: &Decimal) -> Result<(), ValidationError> {
    validation::validate_quantity(*value).map_err(|m| field_error("non_negative", m))
}

fn validate_positive_field(value: &Decimal) -> Result<(), ValidationError> {
    validation::validate_positive_quantity(*value).map_err(|m| field_error("positive", m))
}

fn validate_money_field(value: &Decimal) -> Result<(), ValidationError> {
    validation::validate_money(*value).map_err(|m| field_error("money", m))
}

fn validate_waste_pct_field(value: &Decimal) -> Result<(), ValidationError> {
    validation::validate_waste_pct(*value).map_err(|m| field_error("waste_pct", m))
}

fn validate_name_field(value: &str) -> Result<(), ValidationError> {
    validation::validate_name(value).map_err(|m| field_error("name", m))
}

fn validate_sku_field(value: &str) -> Result<(), ValidationError> {
    validation::validate_sku(value).map_err(|m| field_error("sku", m))
}

fn validate_password_field(value: &str) -> Result<(), ValidationError> {
    validation::validate_password(value).map_err(|m| field_error("password", m))
}

fn default_true() -> bool {
    true
}
