//! Product service: products and their recipe and item usages

use shared::api::{
    CreateProductRequest, ProductDetail, ProductItemLine, ProductRecipeLine, UpdateProductRequest,
    UpsertUsageRequest,
};
use shared::{validate_product_composition, CostSource};
use sqlx::PgPool;
use uuid::Uuid;

use super::CostingService;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

impl ProductService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    fn costing(&self) -> CostingService {
        CostingService::new(self.db.clone())
    }

    async fn ensure_product(&self, org_id: Uuid, product_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1 AND org_id = $2)",
        )
        .bind(product_id)
        .bind(org_id)
        .fetch_one(&self.db)
        .await?;

        if exists {
            Ok(())
        } else {
            Err(AppError::NotFound("Product".to_string()))
        }
    }

    /// Every id must exist in `table` for the organization
    async fn ensure_owned(&self, table: &str, org_id: Uuid, ids: &[Uuid]) -> AppResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let found = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE id = ANY($1) AND org_id = $2",
            table
        ))
        .bind(ids)
        .bind(org_id)
        .fetch_one(&self.db)
        .await?;

        if found as usize == ids.len() {
            Ok(())
        } else {
            Err(AppError::validation(
                table,
                format!("Unknown reference in {}", table),
            ))
        }
    }

    pub async fn create_product(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        input: CreateProductRequest,
    ) -> AppResult<ProductDetail> {
        let recipe_ids: Vec<Uuid> = input.recipes.iter().map(|r| r.recipe_id).collect();
        let item_ids: Vec<Uuid> = input.items.iter().map(|i| i.item_id).collect();
        self.ensure_owned("recipes", org_id, &recipe_ids).await?;
        self.ensure_owned("items", org_id, &item_ids).await?;

        let mut tx = self.db.begin().await?;

        let product_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO products (org_id, name, description, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(org_id)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        for usage in &input.recipes {
            sqlx::query(
                "INSERT INTO product_recipes (product_id, recipe_id, qty_g) VALUES ($1, $2, $3)",
            )
            .bind(product_id)
            .bind(usage.recipe_id)
            .bind(usage.qty_g)
            .execute(&mut *tx)
            .await?;
        }

        for usage in &input.items {
            sqlx::query(
                "INSERT INTO product_items (product_id, item_id, qty_g) VALUES ($1, $2, $3)",
            )
            .bind(product_id)
            .bind(usage.item_id)
            .bind(usage.qty_g)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            %org_id,
            %product_id,
            recipes = input.recipes.len(),
            items = input.items.len(),
            "Product created"
        );
        self.costing().get_product(org_id, product_id).await
    }

    pub async fn update_product(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        product_id: Uuid,
        input: UpdateProductRequest,
    ) -> AppResult<ProductDetail> {
        let updated = sqlx::query(
            r#"
            UPDATE products
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                updated_by = $5,
                updated_at = NOW()
            WHERE id = $1 AND org_id = $2
            "#,
        )
        .bind(product_id)
        .bind(org_id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(&input.description)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        self.costing().get_product(org_id, product_id).await
    }

    pub async fn delete_product(&self, org_id: Uuid, product_id: Uuid) -> AppResult<()> {
        let deleted = sqlx::query("DELETE FROM products WHERE id = $1 AND org_id = $2")
            .bind(product_id)
            .bind(org_id)
            .execute(&self.db)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        tracing::info!(%org_id, %product_id, "Product deleted");
        Ok(())
    }

    pub async fn list_recipe_lines(
        &self,
        org_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Vec<ProductRecipeLine>> {
        let snapshot = self.costing().product_snapshot(org_id, product_id).await?;
        if snapshot.product(product_id).is_none() {
            return Err(AppError::NotFound("Product".to_string()));
        }

        snapshot
            .recipe_usages(product_id)
            .iter()
            .map(|usage| -> AppResult<ProductRecipeLine> {
                let recipe = snapshot
                    .recipe(usage.recipe_id)
                    .ok_or_else(|| AppError::NotFound("Recipe".to_string()))?;
                Ok(ProductRecipeLine {
                    recipe_id: recipe.id,
                    name: recipe.name.clone(),
                    qty_g: usage.qty_g_in_product,
                })
            })
            .collect()
    }

    pub async fn list_item_lines(
        &self,
        org_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Vec<ProductItemLine>> {
        let snapshot = self.costing().product_snapshot(org_id, product_id).await?;
        if snapshot.product(product_id).is_none() {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let units = sqlx::query_as::<_, (Uuid, String)>("SELECT id, symbol FROM units")
            .fetch_all(&self.db)
            .await?;

        snapshot
            .item_usages(product_id)
            .iter()
            .map(|usage| -> AppResult<ProductItemLine> {
                let item = snapshot
                    .item(usage.item_id)
                    .ok_or_else(|| AppError::NotFound("Item".to_string()))?;
                let unit = units
                    .iter()
                    .find(|(id, _)| *id == item.base_unit_id)
                    .map(|(_, symbol)| symbol.clone());
                Ok(ProductItemLine {
                    item_id: item.id,
                    name: item.name.clone(),
                    qty_g: usage.qty_g,
                    unit,
                    cost_per_base_unit: item.cost_per_base_unit()?,
                })
            })
            .collect()
    }

    pub async fn upsert_recipe(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        product_id: Uuid,
        recipe_id: Uuid,
        input: UpsertUsageRequest,
    ) -> AppResult<ProductDetail> {
        self.ensure_product(org_id, product_id).await?;
        self.ensure_owned("recipes", org_id, &[recipe_id]).await?;

        let mut tx = self.db.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO product_recipes (product_id, recipe_id, qty_g)
            VALUES ($1, $2, $3)
            ON CONFLICT (product_id, recipe_id) DO UPDATE SET qty_g = EXCLUDED.qty_g
            "#,
        )
        .bind(product_id)
        .bind(recipe_id)
        .bind(input.qty_g)
        .execute(&mut *tx)
        .await?;
        touch_product(&mut tx, product_id, user_id).await?;
        tx.commit().await?;

        self.costing().get_product(org_id, product_id).await
    }

    pub async fn upsert_item(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        product_id: Uuid,
        item_id: Uuid,
        input: UpsertUsageRequest,
    ) -> AppResult<ProductDetail> {
        self.ensure_product(org_id, product_id).await?;
        self.ensure_owned("items", org_id, &[item_id]).await?;

        let mut tx = self.db.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO product_items (product_id, item_id, qty_g)
            VALUES ($1, $2, $3)
            ON CONFLICT (product_id, item_id) DO UPDATE SET qty_g = EXCLUDED.qty_g
            "#,
        )
        .bind(product_id)
        .bind(item_id)
        .bind(input.qty_g)
        .execute(&mut *tx)
        .await?;
        touch_product(&mut tx, product_id, user_id).await?;
        tx.commit().await?;

        self.costing().get_product(org_id, product_id).await
    }

    pub async fn remove_recipe(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        product_id: Uuid,
        recipe_id: Uuid,
    ) -> AppResult<ProductDetail> {
        self.remove_usage(org_id, user_id, product_id, Usage::Recipe(recipe_id))
            .await
    }

    pub async fn remove_item(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        product_id: Uuid,
        item_id: Uuid,
    ) -> AppResult<ProductDetail> {
        self.remove_usage(org_id, user_id, product_id, Usage::Item(item_id))
            .await
    }

    /// Remove one usage, refusing to leave the product with none
    async fn remove_usage(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        product_id: Uuid,
        usage: Usage,
    ) -> AppResult<ProductDetail> {
        let mut tx = self.db.begin().await?;

        // Concurrent removals on the same product queue behind this lock, so
        // the count below sees every committed delete
        let locked = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM products WHERE id = $1 AND org_id = $2 FOR UPDATE",
        )
        .bind(product_id)
        .bind(org_id)
        .fetch_optional(&mut *tx)
        .await?;
        if locked.is_none() {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let removed = match usage {
            Usage::Recipe(recipe_id) => {
                sqlx::query("DELETE FROM product_recipes WHERE product_id = $1 AND recipe_id = $2")
                    .bind(product_id)
                    .bind(recipe_id)
                    .execute(&mut *tx)
                    .await?
            }
            Usage::Item(item_id) => {
                sqlx::query("DELETE FROM product_items WHERE product_id = $1 AND item_id = $2")
                    .bind(product_id)
                    .bind(item_id)
                    .execute(&mut *tx)
                    .await?
            }
        };

        if removed.rows_affected() == 0 {
            return Err(AppError::NotFound("Product usage".to_string()));
        }

        let (recipes, items) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT (SELECT COUNT(*) FROM product_recipes WHERE product_id = $1),
                   (SELECT COUNT(*) FROM product_items WHERE product_id = $1)
            "#,
        )
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;

        // Dropping the transaction rolls the delete back
        validate_product_composition(recipes as usize, items as usize)
            .map_err(|msg| AppError::validation("composition", msg))?;

        touch_product(&mut tx, product_id, user_id).await?;
        tx.commit().await?;

        self.costing().get_product(org_id, product_id).await
    }
}

enum Usage {
    Recipe(Uuid),
    Item(Uuid),
}

async fn touch_product(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product_id: Uuid,
    user_id: Uuid,
) -> AppResult<()> {
    sqlx::query("UPDATE products SET updated_by = $2, updated_at = NOW() WHERE id = $1")
        .bind(product_id)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_db::{connect, remaining_usages, seed_burger, Burger};

    #[tokio::test]
    #[ignore = "Requires PostgreSQL at DATABASE_URL"]
    async fn test_removing_last_usage_rolls_back() {
        let pool = connect().await;
        let burger = seed_burger(&pool).await;
        let service = ProductService::new(pool.clone());

        service
            .remove_recipe(burger.org_id, burger.user_id, burger.product_id, burger.recipe_id)
            .await
            .unwrap();
        let last = service
            .remove_item(burger.org_id, burger.user_id, burger.product_id, burger.item_id)
            .await;

        assert!(matches!(last, Err(AppError::Validation { .. })));
        assert_eq!(remaining_usages(&pool, burger.product_id).await, 1);
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL at DATABASE_URL"]
    async fn test_concurrent_removals_leave_one_usage() {
        let pool = connect().await;
        let burger = seed_burger(&pool).await;
        let recipes = ProductService::new(pool.clone());
        let items = ProductService::new(pool.clone());

        let Burger {
            org_id,
            user_id,
            product_id,
            recipe_id,
            item_id,
        } = burger;

        let (recipe_removed, item_removed) = tokio::join!(
            recipes.remove_recipe(org_id, user_id, product_id, recipe_id),
            items.remove_item(org_id, user_id, product_id, item_id),
        );

        assert!(recipe_removed.is_ok() != item_removed.is_ok());
        assert_eq!(remaining_usages(&pool, product_id).await, 1);
    }
}
