//! Item catalogue service: items, units of measure and categories

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::api::{CreateCategoryRequest, CreateItemRequest, ItemDetail, UpdateItemRequest};
use shared::{base_qty_for_purchase, cost_per_base_unit, Category, Unit};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{CategoryRow, ItemRow, UnitRow};

#[derive(Clone)]
pub struct ItemService {
    db: PgPool,
}

/// Item joined with its unit symbols and category name
#[derive(Debug, sqlx::FromRow)]
struct ItemDetailRow {
    id: Uuid,
    name: String,
    sku: String,
    purchase_unit_id: Uuid,
    purchase_unit: String,
    purchase_qty: Decimal,
    purchase_cost: Decimal,
    base_unit_id: Uuid,
    base_unit: String,
    base_qty_per_purchase: Decimal,
    category_id: Option<Uuid>,
    category_name: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ItemDetailRow {
    fn into_detail(self) -> AppResult<ItemDetail> {
        let cost_per_base_unit =
            cost_per_base_unit(self.purchase_cost, self.base_qty_per_purchase)?;
        Ok(ItemDetail {
            id: self.id,
            name: self.name,
            sku: self.sku,
            purchase_unit_id: self.purchase_unit_id,
            purchase_unit: self.purchase_unit,
            purchase_qty: self.purchase_qty,
            purchase_cost: self.purchase_cost,
            base_unit_id: self.base_unit_id,
            base_unit: self.base_unit,
            base_qty_per_purchase: self.base_qty_per_purchase,
            cost_per_base_unit,
            category_id: self.category_id,
            category_name: self.category_name,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const ITEM_DETAIL_SELECT: &str = r#"
    SELECT i.id, i.name, i.sku,
           i.purchase_unit_id, pu.symbol AS purchase_unit, i.purchase_qty, i.purchase_cost,
           i.base_unit_id, bu.symbol AS base_unit, i.base_qty_per_purchase,
           i.category_id, c.name AS category_name, i.active, i.created_at, i.updated_at
    FROM items i
    JOIN units pu ON pu.id = i.purchase_unit_id
    JOIN units bu ON bu.id = i.base_unit_id
    LEFT JOIN categories c ON c.id = i.category_id
"#;

impl ItemService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Units and categories
    // ========================================================================

    pub async fn list_units(&self) -> AppResult<Vec<Unit>> {
        let rows = sqlx::query_as::<_, UnitRow>(
            "SELECT id, name, symbol, unit_type FROM units ORDER BY unit_type, name",
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|row| Unit::try_from(row).map_err(AppError::Internal))
            .collect()
    }

    async fn unit_symbol(&self, unit_id: Uuid) -> AppResult<String> {
        sqlx::query_scalar::<_, String>("SELECT symbol FROM units WHERE id = $1")
            .bind(unit_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::validation("unit_id", format!("Unknown unit {}", unit_id)))
    }

    pub async fn list_categories(&self, org_id: Uuid) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, org_id, name FROM categories WHERE org_id = $1 ORDER BY name",
        )
        .bind(org_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    pub async fn create_category(
        &self,
        org_id: Uuid,
        input: CreateCategoryRequest,
    ) -> AppResult<Category> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "INSERT INTO categories (org_id, name) VALUES ($1, $2) RETURNING id, org_id, name",
        )
        .bind(org_id)
        .bind(input.name.trim())
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn ensure_category(&self, org_id: Uuid, category_id: Option<Uuid>) -> AppResult<()> {
        let Some(category_id) = category_id else {
            return Ok(());
        };

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1 AND org_id = $2)",
        )
        .bind(category_id)
        .bind(org_id)
        .fetch_one(&self.db)
        .await?;

        if exists {
            Ok(())
        } else {
            Err(AppError::validation("category_id", "Unknown category"))
        }
    }

    // ========================================================================
    // Items
    // ========================================================================

    pub async fn list_items(&self, org_id: Uuid) -> AppResult<Vec<ItemDetail>> {
        let rows = sqlx::query_as::<_, ItemDetailRow>(&format!(
            "{} WHERE i.org_id = $1 ORDER BY i.name ASC",
            ITEM_DETAIL_SELECT
        ))
        .bind(org_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(ItemDetailRow::into_detail).collect()
    }

    pub async fn get_item(&self, org_id: Uuid, item_id: Uuid) -> AppResult<ItemDetail> {
        sqlx::query_as::<_, ItemDetailRow>(&format!(
            "{} WHERE i.id = $1 AND i.org_id = $2",
            ITEM_DETAIL_SELECT
        ))
        .bind(item_id)
        .bind(org_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Item".to_string()))?
        .into_detail()
    }

    /// Base units in one purchase, given explicitly or derived from the units
    async fn resolve_base_qty(
        &self,
        explicit: Option<Decimal>,
        purchase_qty: Decimal,
        purchase_unit_id: Uuid,
        base_unit_id: Uuid,
    ) -> AppResult<Decimal> {
        let purchase_unit = self.unit_symbol(purchase_unit_id).await?;
        let base_unit = self.unit_symbol(base_unit_id).await?;

        match explicit {
            Some(qty) => Ok(qty),
            None => Ok(base_qty_for_purchase(purchase_qty, &purchase_unit, &base_unit)?),
        }
    }

    pub async fn create_item(
        &self,
        org_id: Uuid,
        input: CreateItemRequest,
    ) -> AppResult<ItemDetail> {
        self.ensure_category(org_id, input.category_id).await?;

        let base_qty = self
            .resolve_base_qty(
                input.base_qty_per_purchase,
                input.purchase_qty,
                input.purchase_unit_id,
                input.base_unit_id,
            )
            .await?;

        // Reject anything the engine could not price
        cost_per_base_unit(input.purchase_cost, base_qty)?;

        let item_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO items (org_id, name, sku, purchase_unit_id, purchase_qty, purchase_cost,
                               base_unit_id, base_qty_per_purchase, category_id, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(org_id)
        .bind(input.name.trim())
        .bind(&input.sku)
        .bind(input.purchase_unit_id)
        .bind(input.purchase_qty)
        .bind(input.purchase_cost)
        .bind(input.base_unit_id)
        .bind(base_qty)
        .bind(input.category_id)
        .bind(input.active)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(%org_id, %item_id, "Item created");
        self.get_item(org_id, item_id).await
    }

    async fn find_item_row(&self, org_id: Uuid, item_id: Uuid) -> AppResult<ItemRow> {
        sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, org_id, name, sku, purchase_unit_id, purchase_qty, purchase_cost,
                   base_unit_id, base_qty_per_purchase, category_id, active,
                   created_at, updated_at
            FROM items
            WHERE id = $1 AND org_id = $2
            "#,
        )
        .bind(item_id)
        .bind(org_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Item".to_string()))
    }

    /// Apply a partial update; recipes and products see the new cost on their next read
    pub async fn update_item(
        &self,
        org_id: Uuid,
        item_id: Uuid,
        input: UpdateItemRequest,
    ) -> AppResult<ItemDetail> {
        let current = self.find_item_row(org_id, item_id).await?;

        if input.category_id.is_some() {
            self.ensure_category(org_id, input.category_id).await?;
        }

        let purchase_qty = input.purchase_qty.unwrap_or(current.purchase_qty);
        let purchase_unit_id = input.purchase_unit_id.unwrap_or(current.purchase_unit_id);
        let base_unit_id = input.base_unit_id.unwrap_or(current.base_unit_id);
        let packaging_changed = input.purchase_qty.is_some()
            || input.purchase_unit_id.is_some()
            || input.base_unit_id.is_some();

        let base_qty = match (input.base_qty_per_purchase, packaging_changed) {
            (Some(qty), _) => qty,
            (None, true) => {
                self.resolve_base_qty(None, purchase_qty, purchase_unit_id, base_unit_id)
                    .await?
            }
            (None, false) => current.base_qty_per_purchase,
        };
        let purchase_cost = input.purchase_cost.unwrap_or(current.purchase_cost);

        cost_per_base_unit(purchase_cost, base_qty)?;

        sqlx::query(
            r#"
            UPDATE items
            SET name = $3, sku = $4, purchase_unit_id = $5, purchase_qty = $6,
                purchase_cost = $7, base_unit_id = $8, base_qty_per_purchase = $9,
                category_id = $10, active = $11, updated_at = NOW()
            WHERE id = $1 AND org_id = $2
            "#,
        )
        .bind(item_id)
        .bind(org_id)
        .bind(input.name.as_deref().map(str::trim).unwrap_or(&current.name))
        .bind(input.sku.as_deref().unwrap_or(&current.sku))
        .bind(purchase_unit_id)
        .bind(purchase_qty)
        .bind(purchase_cost)
        .bind(base_unit_id)
        .bind(base_qty)
        .bind(input.category_id.or(current.category_id))
        .bind(input.active.unwrap_or(current.active))
        .execute(&self.db)
        .await?;

        tracing::info!(%org_id, %item_id, "Item updated");
        self.get_item(org_id, item_id).await
    }

    /// Delete an item that no recipe or product uses
    pub async fn delete_item(&self, org_id: Uuid, item_id: Uuid) -> AppResult<()> {
        self.find_item_row(org_id, item_id).await?;

        let (recipes, products) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT (SELECT COUNT(*) FROM recipe_items WHERE item_id = $1),
                   (SELECT COUNT(*) FROM product_items WHERE item_id = $1)
            "#,
        )
        .bind(item_id)
        .fetch_one(&self.db)
        .await?;

        if recipes > 0 || products > 0 {
            return Err(AppError::conflict(
                "item",
                format!(
                    "Item is used by {} recipe(s) and {} product(s)",
                    recipes, products
                ),
            ));
        }

        sqlx::query("DELETE FROM items WHERE id = $1 AND org_id = $2")
            .bind(item_id)
            .bind(org_id)
            .execute(&self.db)
            .await?;

        tracing::info!(%org_id, %item_id, "Item deleted");
        Ok(())
    }
}
