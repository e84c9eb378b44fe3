//! Cost read model
//!
//! Every derived total the API returns is computed here, from a snapshot of
//! the organization's data read in a single REPEATABLE READ transaction.

use shared::api::{average_cost, DashboardSummary, ProductDetail, ProductSummary, RecipeDetail};
use shared::{compute_product_cost_by_id, compute_recipe_cost_by_id, CostSnapshot, CostSource};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    ItemRow, ProductItemRow, ProductRecipeRow, ProductRow, RecipeItemRow, RecipeRow,
};

#[derive(Clone)]
pub struct CostingService {
    db: PgPool,
}

impl CostingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Point-in-time copy of everything the engine may reference for `org_id`
    pub async fn snapshot(&self, org_id: Uuid) -> AppResult<CostSnapshot> {
        self.load(org_id, SnapshotScope::Organization).await
    }

    /// Snapshot holding one recipe, its lines and the items they use
    pub async fn recipe_snapshot(&self, org_id: Uuid, recipe_id: Uuid) -> AppResult<CostSnapshot> {
        self.load(org_id, SnapshotScope::Recipe(recipe_id)).await
    }

    /// Snapshot holding one product and every recipe and item it reaches
    pub async fn product_snapshot(
        &self,
        org_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<CostSnapshot> {
        self.load(org_id, SnapshotScope::Product(product_id)).await
    }

    async fn load(&self, org_id: Uuid, scope: SnapshotScope) -> AppResult<CostSnapshot> {
        let queries = scope.queries();

        let mut tx = self.db.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let items = scope
            .bind(sqlx::query_as::<_, ItemRow>(queries.items).bind(org_id))
            .fetch_all(&mut *tx)
            .await?;
        let recipes = scope
            .bind(sqlx::query_as::<_, RecipeRow>(queries.recipes).bind(org_id))
            .fetch_all(&mut *tx)
            .await?;
        let lines = scope
            .bind(sqlx::query_as::<_, RecipeItemRow>(queries.lines).bind(org_id))
            .fetch_all(&mut *tx)
            .await?;
        let products = match queries.products {
            Some(sql) => {
                scope
                    .bind(sqlx::query_as::<_, ProductRow>(sql).bind(org_id))
                    .fetch_all(&mut *tx)
                    .await?
            }
            None => Vec::new(),
        };
        let recipe_usages = match queries.recipe_usages {
            Some(sql) => {
                scope
                    .bind(sqlx::query_as::<_, ProductRecipeRow>(sql).bind(org_id))
                    .fetch_all(&mut *tx)
                    .await?
            }
            None => Vec::new(),
        };
        let item_usages = match queries.item_usages {
            Some(sql) => {
                scope
                    .bind(sqlx::query_as::<_, ProductItemRow>(sql).bind(org_id))
                    .fetch_all(&mut *tx)
                    .await?
            }
            None => Vec::new(),
        };

        tx.commit().await?;

        let mut snapshot = CostSnapshot::new();
        items.into_iter().for_each(|row| snapshot.insert_item(row.into()));
        recipes.into_iter().for_each(|row| snapshot.insert_recipe(row.into()));
        lines.into_iter().for_each(|row| snapshot.insert_recipe_line(row.into()));
        products.into_iter().for_each(|row| snapshot.insert_product(row.into()));
        recipe_usages
            .into_iter()
            .for_each(|row| snapshot.insert_recipe_usage(row.into()));
        item_usages
            .into_iter()
            .for_each(|row| snapshot.insert_item_usage(row.into()));

        tracing::debug!(%org_id, ?scope, "Loaded cost snapshot");
        Ok(snapshot)
    }

    pub async fn list_recipes(&self, org_id: Uuid) -> AppResult<Vec<RecipeDetail>> {
        let snapshot = self.snapshot(org_id).await?;

        let mut recipes = snapshot.recipes().collect::<Vec<_>>();
        recipes.sort_by(|a, b| a.name.cmp(&b.name));

        recipes
            .into_iter()
            .map(|recipe| -> AppResult<RecipeDetail> {
                let cost = compute_recipe_cost_by_id(recipe.id, &snapshot)?;
                Ok(RecipeDetail::new(recipe, cost))
            })
            .collect()
    }

    pub async fn get_recipe(&self, org_id: Uuid, recipe_id: Uuid) -> AppResult<RecipeDetail> {
        let snapshot = self.recipe_snapshot(org_id, recipe_id).await?;
        let recipe = snapshot
            .recipe(recipe_id)
            .ok_or_else(|| AppError::NotFound("Recipe".to_string()))?;

        let cost = compute_recipe_cost_by_id(recipe_id, &snapshot)?;
        Ok(RecipeDetail::new(recipe, cost))
    }

    pub async fn list_products(&self, org_id: Uuid) -> AppResult<Vec<ProductSummary>> {
        let snapshot = self.snapshot(org_id).await?;

        let mut products = snapshot.products().collect::<Vec<_>>();
        products.sort_by(|a, b| a.name.cmp(&b.name));

        products
            .into_iter()
            .map(|product| -> AppResult<ProductSummary> {
                let cost = compute_product_cost_by_id(product.id, &snapshot)?;
                Ok(ProductSummary::new(product, &cost))
            })
            .collect()
    }

    /// Product with its full cost breakdown
    pub async fn get_product(&self, org_id: Uuid, product_id: Uuid) -> AppResult<ProductDetail> {
        let snapshot = self.product_snapshot(org_id, product_id).await?;
        let product = snapshot
            .product(product_id)
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let cost = compute_product_cost_by_id(product_id, &snapshot)?;
        Ok(ProductDetail::new(product, cost))
    }

    pub async fn dashboard(&self, org_id: Uuid) -> AppResult<DashboardSummary> {
        let snapshot = self.snapshot(org_id).await?;

        let costs = snapshot
            .products()
            .map(|product| {
                compute_product_cost_by_id(product.id, &snapshot)
                    .map(|cost| cost.total_finished_product_cost)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let item_costs: Vec<_> = snapshot.items().map(|item| item.purchase_cost).collect();

        Ok(DashboardSummary {
            total_items: snapshot.items().count(),
            active_items: snapshot.items().filter(|item| item.active).count(),
            total_recipes: snapshot.recipes().count(),
            total_products: costs.len(),
            average_product_cost: average_cost(&costs)?,
            average_item_cost: average_cost(&item_costs)?,
        })
    }
}

/// Which part of an organization a snapshot covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnapshotScope {
    Organization,
    Recipe(Uuid),
    Product(Uuid),
}

/// One query per snapshot table. `$1` is always the organization; scoped
/// queries take the recipe or product id as `$2`. Tables a scope never
/// reaches have no query.
struct SnapshotQueries {
    items: &'static str,
    recipes: &'static str,
    lines: &'static str,
    products: Option<&'static str>,
    recipe_usages: Option<&'static str>,
    item_usages: Option<&'static str>,
}

impl SnapshotScope {
    fn id(self) -> Option<Uuid> {
        match self {
            SnapshotScope::Organization => None,
            SnapshotScope::Recipe(id) | SnapshotScope::Product(id) => Some(id),
        }
    }

    fn bind<'q, O>(
        self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        match self.id() {
            Some(id) => query.bind(id),
            None => query,
        }
    }

    fn queries(self) -> &'static SnapshotQueries {
        match self {
            SnapshotScope::Organization => &ORGANIZATION_QUERIES,
            SnapshotScope::Recipe(_) => &RECIPE_QUERIES,
            SnapshotScope::Product(_) => &PRODUCT_QUERIES,
        }
    }
}

static ORGANIZATION_QUERIES: SnapshotQueries = SnapshotQueries {
    items: r#"
        SELECT id, org_id, name, sku, purchase_unit_id, purchase_qty, purchase_cost,
               base_unit_id, base_qty_per_purchase, category_id, active,
               created_at, updated_at
        FROM items
        WHERE org_id = $1
    "#,
    recipes: r#"
        SELECT id, org_id, name, description, yield_qty_g,
               created_by, created_at, updated_by, updated_at
        FROM recipes
        WHERE org_id = $1
    "#,
    lines: r#"
        SELECT ri.recipe_id, ri.item_id, ri.qty_g, ri.waste_pct
        FROM recipe_items ri
        JOIN recipes r ON r.id = ri.recipe_id
        JOIN items i ON i.id = ri.item_id
        WHERE r.org_id = $1
        ORDER BY ri.recipe_id, i.name ASC
    "#,
    products: Some(
        r#"
        SELECT id, org_id, name, description, created_by, created_at, updated_by, updated_at
        FROM products
        WHERE org_id = $1
    "#,
    ),
    recipe_usages: Some(
        r#"
        SELECT pr.product_id, pr.recipe_id, pr.qty_g
        FROM product_recipes pr
        JOIN products p ON p.id = pr.product_id
        JOIN recipes r ON r.id = pr.recipe_id
        WHERE p.org_id = $1
        ORDER BY pr.product_id, r.name ASC
    "#,
    ),
    item_usages: Some(
        r#"
        SELECT pi.product_id, pi.item_id, pi.qty_g
        FROM product_items pi
        JOIN products p ON p.id = pi.product_id
        JOIN items i ON i.id = pi.item_id
        WHERE p.org_id = $1
        ORDER BY pi.product_id, i.name ASC
    "#,
    ),
};

static RECIPE_QUERIES: SnapshotQueries = SnapshotQueries {
    items: r#"
        SELECT id, org_id, name, sku, purchase_unit_id, purchase_qty, purchase_cost,
               base_unit_id, base_qty_per_purchase, category_id, active,
               created_at, updated_at
        FROM items
        WHERE org_id = $1
          AND id IN (SELECT item_id FROM recipe_items WHERE recipe_id = $2)
    "#,
    recipes: r#"
        SELECT id, org_id, name, description, yield_qty_g,
               created_by, created_at, updated_by, updated_at
        FROM recipes
        WHERE org_id = $1 AND id = $2
    "#,
    lines: r#"
        SELECT ri.recipe_id, ri.item_id, ri.qty_g, ri.waste_pct
        FROM recipe_items ri
        JOIN recipes r ON r.id = ri.recipe_id
        JOIN items i ON i.id = ri.item_id
        WHERE r.org_id = $1 AND ri.recipe_id = $2
        ORDER BY i.name ASC
    "#,
    products: None,
    recipe_usages: None,
    item_usages: None,
};

static PRODUCT_QUERIES: SnapshotQueries = SnapshotQueries {
    items: r#"
        SELECT id, org_id, name, sku, purchase_unit_id, purchase_qty, purchase_cost,
               base_unit_id, base_qty_per_purchase, category_id, active,
               created_at, updated_at
        FROM items
        WHERE org_id = $1
          AND (
              id IN (SELECT item_id FROM product_items WHERE product_id = $2)
              OR id IN (
                  SELECT ri.item_id
                  FROM recipe_items ri
                  JOIN product_recipes pr ON pr.recipe_id = ri.recipe_id
                  WHERE pr.product_id = $2
              )
          )
    "#,
    recipes: r#"
        SELECT id, org_id, name, description, yield_qty_g,
               created_by, created_at, updated_by, updated_at
        FROM recipes
        WHERE org_id = $1
          AND id IN (SELECT recipe_id FROM product_recipes WHERE product_id = $2)
    "#,
    lines: r#"
        SELECT ri.recipe_id, ri.item_id, ri.qty_g, ri.waste_pct
        FROM recipe_items ri
        JOIN recipes r ON r.id = ri.recipe_id
        JOIN items i ON i.id = ri.item_id
        WHERE r.org_id = $1
          AND ri.recipe_id IN (SELECT recipe_id FROM product_recipes WHERE product_id = $2)
        ORDER BY ri.recipe_id, i.name ASC
    "#,
    products: Some(
        r#"
        SELECT id, org_id, name, description, created_by, created_at, updated_by, updated_at
        FROM products
        WHERE org_id = $1 AND id = $2
    "#,
    ),
    recipe_usages: Some(
        r#"
        SELECT pr.product_id, pr.recipe_id, pr.qty_g
        FROM product_recipes pr
        JOIN products p ON p.id = pr.product_id
        JOIN recipes r ON r.id = pr.recipe_id
        WHERE p.org_id = $1 AND pr.product_id = $2
        ORDER BY r.name ASC
    "#,
    ),
    item_usages: Some(
        r#"
        SELECT pi.product_id, pi.item_id, pi.qty_g
        FROM product_items pi
        JOIN products p ON p.id = pi.product_id
        JOIN items i ON i.id = pi.item_id
        WHERE p.org_id = $1 AND pi.product_id = $2
        ORDER BY i.name ASC
    "#,
    ),
};
