//! Costing errors

use thiserror::Error;
use uuid::Uuid;

/// Failure modes of the cost engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CostingError {
    /// Input has an invalid shape (negative quantity, waste out of range, ...)
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    /// A referenced item or recipe could not be resolved
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// A divisor (recipe yield, purchase conversion) is zero or negative
    #[error("Division by zero: {field} must be greater than zero")]
    DivisionByZero { field: &'static str },

    #[error("Arithmetic overflow while computing {operation}")]
    Overflow { operation: &'static str },
}

impl CostingError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CostingError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn item_not_found(id: Uuid) -> Self {
        CostingError::NotFound { entity: "Item", id }
    }

    pub fn recipe_not_found(id: Uuid) -> Self {
        CostingError::NotFound { entity: "Recipe", id }
    }

    pub fn product_not_found(id: Uuid) -> Self {
        CostingError::NotFound { entity: "Product", id }
    }
}

/// Result type alias for the cost engine
pub type CostingResult<T> = Result<T, CostingError>;
