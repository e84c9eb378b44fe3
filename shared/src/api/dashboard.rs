//! Dashboard payloads

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::costing::{CostingError, CostingResult};

/// Organization-wide figures shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    pub total_items: usize,
    pub active_items: usize,
    pub total_recipes: usize,
    pub total_products: usize,
    pub average_product_cost: Decimal,
    /// Mean purchase cost over every item, active or not
    pub average_item_cost: Decimal,
}

/// Mean of `costs`, zero when the slice is empty
pub fn average_cost(costs: &[Decimal]) -> CostingResult<Decimal> {
    if costs.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let total = costs.iter().try_fold(Decimal::ZERO, |acc, c| {
        acc.checked_add(*c).ok_or(CostingError::Overflow {
            operation: "average_cost",
        })
    })?;
    total
        .checked_div(Decimal::from(costs.len()))
        .ok_or(CostingError::Overflow {
            operation: "average_cost",
        })
}
