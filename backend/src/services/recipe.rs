//! Recipe service: recipes and their ingredient lines
//!
//! Writes only touch stored inputs (yield, quantities, waste). Costs are
//! read back through [`CostingService`].

use shared::api::{
    CreateRecipeRequest, RecipeDetail, UpdateRecipeRequest, UpsertRecipeItemRequest,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::CostingService;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct RecipeService {
    db: PgPool,
}

impl RecipeService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    fn costing(&self) -> CostingService {
        CostingService::new(self.db.clone())
    }

    async fn ensure_recipe(&self, org_id: Uuid, recipe_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM recipes WHERE id = $1 AND org_id = $2)",
        )
        .bind(recipe_id)
        .bind(org_id)
        .fetch_one(&self.db)
        .await?;

        if exists {
            Ok(())
        } else {
            Err(AppError::NotFound("Recipe".to_string()))
        }
    }

    /// Every id must name an item of the organization
    async fn ensure_items(&self, org_id: Uuid, item_ids: &[Uuid]) -> AppResult<()> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM items WHERE id = ANY($1) AND org_id = $2",
        )
        .bind(item_ids)
        .bind(org_id)
        .fetch_one(&self.db)
        .await?;

        if found as usize == item_ids.len() {
            Ok(())
        } else {
            Err(AppError::validation("item_id", "Unknown item in ingredient list"))
        }
    }

    pub async fn create_recipe(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        input: CreateRecipeRequest,
    ) -> AppResult<RecipeDetail> {
        let item_ids: Vec<Uuid> = input.ingredients.iter().map(|i| i.item_id).collect();
        self.ensure_items(org_id, &item_ids).await?;

        let mut tx = self.db.begin().await?;

        let recipe_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO recipes (org_id, name, description, yield_qty_g, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(org_id)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(input.yield_qty_g)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        for ingredient in &input.ingredients {
            sqlx::query(
                r#"
                INSERT INTO recipe_items (recipe_id, item_id, qty_g, waste_pct)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(recipe_id)
            .bind(ingredient.item_id)
            .bind(ingredient.qty_g)
            .bind(ingredient.waste_pct)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            %org_id,
            %recipe_id,
            ingredients = input.ingredients.len(),
            "Recipe created"
        );
        self.costing().get_recipe(org_id, recipe_id).await
    }

    pub async fn update_recipe(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        recipe_id: Uuid,
        input: UpdateRecipeRequest,
    ) -> AppResult<RecipeDetail> {
        let updated = sqlx::query(
            r#"
            UPDATE recipes
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                yield_qty_g = COALESCE($5, yield_qty_g),
                updated_by = $6,
                updated_at = NOW()
            WHERE id = $1 AND org_id = $2
            "#,
        )
        .bind(recipe_id)
        .bind(org_id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(&input.description)
        .bind(input.yield_qty_g)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Recipe".to_string()));
        }

        tracing::info!(%org_id, %recipe_id, "Recipe updated");
        self.costing().get_recipe(org_id, recipe_id).await
    }

    /// Delete a recipe that no product uses
    pub async fn delete_recipe(&self, org_id: Uuid, recipe_id: Uuid) -> AppResult<()> {
        self.ensure_recipe(org_id, recipe_id).await?;

        let products = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM product_recipes WHERE recipe_id = $1",
        )
        .bind(recipe_id)
        .fetch_one(&self.db)
        .await?;

        if products > 0 {
            return Err(AppError::conflict(
                "recipe",
                format!("Recipe is used by {} product(s)", products),
            ));
        }

        sqlx::query("DELETE FROM recipes WHERE id = $1 AND org_id = $2")
            .bind(recipe_id)
            .bind(org_id)
            .execute(&self.db)
            .await?;

        tracing::info!(%org_id, %recipe_id, "Recipe deleted");
        Ok(())
    }

    /// Add an ingredient or change its quantity; repeating the call is a no-op
    pub async fn upsert_item(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        recipe_id: Uuid,
        item_id: Uuid,
        input: UpsertRecipeItemRequest,
    ) -> AppResult<RecipeDetail> {
        self.ensure_recipe(org_id, recipe_id).await?;
        self.ensure_items(org_id, &[item_id]).await?;

        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO recipe_items (recipe_id, item_id, qty_g, waste_pct)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (recipe_id, item_id)
            DO UPDATE SET qty_g = EXCLUDED.qty_g, waste_pct = EXCLUDED.waste_pct
            "#,
        )
        .bind(recipe_id)
        .bind(item_id)
        .bind(input.qty_g)
        .bind(input.waste_pct)
        .execute(&mut *tx)
        .await?;

        touch_recipe(&mut tx, recipe_id, user_id).await?;
        tx.commit().await?;

        self.costing().get_recipe(org_id, recipe_id).await
    }

    pub async fn remove_item(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        recipe_id: Uuid,
        item_id: Uuid,
    ) -> AppResult<RecipeDetail> {
        self.ensure_recipe(org_id, recipe_id).await?;

        let mut tx = self.db.begin().await?;

        let removed = sqlx::query("DELETE FROM recipe_items WHERE recipe_id = $1 AND item_id = $2")
            .bind(recipe_id)
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        if removed.rows_affected() == 0 {
            return Err(AppError::NotFound("Recipe ingredient".to_string()));
        }

        touch_recipe(&mut tx, recipe_id, user_id).await?;
        tx.commit().await?;

        self.costing().get_recipe(org_id, recipe_id).await
    }
}

async fn touch_recipe(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    recipe_id: Uuid,
    user_id: Uuid,
) -> AppResult<()> {
    sqlx::query("UPDATE recipes SET updated_by = $2, updated_at = NOW() WHERE id = $1")
        .bind(recipe_id)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
