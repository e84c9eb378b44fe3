//! Item, unit and category payloads

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{
    default_true, validate_money_field, validate_name_field, validate_positive_field,
    validate_sku_field,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(custom = "validate_name_field")]
    pub name: String,
    #[validate(custom = "validate_sku_field")]
    pub sku: String,
    pub purchase_unit_id: Uuid,
    #[validate(custom = "validate_positive_field")]
    pub purchase_qty: Decimal,
    #[validate(custom = "validate_money_field")]
    pub purchase_cost: Decimal,
    pub base_unit_id: Uuid,
    /// Derived from the purchase quantity and units when omitted
    #[validate(custom = "validate_positive_field")]
    pub base_qty_per_purchase: Option<Decimal>,
    pub category_id: Option<Uuid>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(custom = "validate_name_field")]
    pub name: Option<String>,
    #[validate(custom = "validate_sku_field")]
    pub sku: Option<String>,
    pub purchase_unit_id: Option<Uuid>,
    #[validate(custom = "validate_positive_field")]
    pub purchase_qty: Option<Decimal>,
    #[validate(custom = "validate_money_field")]
    pub purchase_cost: Option<Decimal>,
    pub base_unit_id: Option<Uuid>,
    #[validate(custom = "validate_positive_field")]
    pub base_qty_per_purchase: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub active: Option<bool>,
}

/// Item as listed to the client, with its derived unit cost
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemDetail {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub purchase_unit_id: Uuid,
    pub purchase_unit: String,
    pub purchase_qty: Decimal,
    pub purchase_cost: Decimal,
    pub base_unit_id: Uuid,
    pub base_unit: String,
    pub base_qty_per_purchase: Decimal,
    pub cost_per_base_unit: Decimal,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(custom = "validate_name_field")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn request() -> CreateItemRequest {
        CreateItemRequest {
            name: "Flour".to_string(),
            sku: "FLR-25".to_string(),
            purchase_unit_id: Uuid::new_v4(),
            purchase_qty: Decimal::ONE,
            purchase_cost: Decimal::from_str("10.00").unwrap(),
            base_unit_id: Uuid::new_v4(),
            base_qty_per_purchase: Some(Decimal::from(1000)),
            category_id: None,
            active: true,
        }
    }

    #[test]
    fn test_valid_item() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_zero_conversion_factor_rejected_at_entry() {
        let mut item = request();
        item.base_qty_per_purchase = Some(Decimal::ZERO);
        let errors = item.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("base_qty_per_purchase"));
    }

    #[test]
    fn test_negative_cost_rejected() {
        let mut item = request();
        item.purchase_cost = Decimal::from(-3);
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_active_defaults_to_true() {
        let json = r#"{
            "name": "Salt",
            "sku": "SALT",
            "purchase_unit_id": "00000000-0000-0000-0000-000000000001",
            "purchase_qty": "1",
            "purchase_cost": "2.5",
            "base_unit_id": "00000000-0000-0000-0000-000000000002"
        }"#;
        let item: CreateItemRequest = serde_json::from_str(json).unwrap();
        assert!(item.active);
        assert!(item.base_qty_per_purchase.is_none());
    }

    #[test]
    fn test_update_checks_optional_name_and_sku() {
        let blank_name = UpdateItemRequest {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        let errors = blank_name.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let bad_sku = UpdateItemRequest {
            sku: Some("has space".to_string()),
            ..Default::default()
        };
        let errors = bad_sku.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sku"));

        let rename = UpdateItemRequest {
            name: Some("Bread Flour".to_string()),
            sku: Some("FLR-50".to_string()),
            ..Default::default()
        };
        assert!(rename.validate().is_ok());
        assert!(UpdateItemRequest::default().validate().is_ok());
    }
}
