//! PostgreSQL fixtures for service tests that need a live database

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

pub struct Burger {
    pub org_id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub recipe_id: Uuid,
    pub item_id: Uuid,
}

pub async fn connect() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .expect("connect to PostgreSQL");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}

/// A product using one recipe (100 g of dough) and one direct item (10 g of flour)
pub async fn seed_burger(pool: &PgPool) -> Burger {
    let org_id: Uuid =
        sqlx::query_scalar("INSERT INTO organizations (name) VALUES ('Bistro') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap();
    let user_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO employees (org_id, email, password_hash, full_name, role)
        VALUES ($1, $2, 'not-a-hash', 'Chef', 'OWNER')
        RETURNING id
        "#,
    )
    .bind(org_id)
    .bind(format!("chef-{}@bistro.test", Uuid::new_v4()))
    .fetch_one(pool)
    .await
    .unwrap();
    let item_id = insert_item(pool, org_id, "Flour", "FLR").await;
    let recipe_id: Uuid = sqlx::query_scalar(
        "INSERT INTO recipes (org_id, name, yield_qty_g) VALUES ($1, 'Dough', 1000) \
         RETURNING id",
    )
    .bind(org_id)
    .fetch_one(pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO recipe_items (recipe_id, item_id, qty_g) VALUES ($1, $2, 1000)")
        .bind(recipe_id)
        .bind(item_id)
        .execute(pool)
        .await
        .unwrap();
    let product_id: Uuid = sqlx::query_scalar(
        "INSERT INTO products (org_id, name) VALUES ($1, 'Burger') RETURNING id",
    )
    .bind(org_id)
    .fetch_one(pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO product_recipes (product_id, recipe_id, qty_g) VALUES ($1, $2, 100)",
    )
    .bind(product_id)
    .bind(recipe_id)
    .execute(pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO product_items (product_id, item_id, qty_g) VALUES ($1, $2, 10)")
        .bind(product_id)
        .bind(item_id)
        .execute(pool)
        .await
        .unwrap();

    Burger {
        org_id,
        user_id,
        product_id,
        recipe_id,
        item_id,
    }
}

pub async fn remaining_usages(pool: &PgPool, product_id: Uuid) -> i64 {
    sqlx::query_scalar(
        r#"
        SELECT (SELECT COUNT(*) FROM product_recipes WHERE product_id = $1)
             + (SELECT COUNT(*) FROM product_items WHERE product_id = $1)
        "#,
    )
    .bind(product_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// An item bought by the kilogram at 10.00 and used in grams
pub async fn insert_item(pool: &PgPool, org_id: Uuid, name: &str, sku: &str) -> Uuid {
    let gram: Uuid = sqlx::query_scalar("SELECT id FROM units WHERE symbol = 'g'")
        .fetch_one(pool)
        .await
        .unwrap();
    sqlx::query_scalar(
        r#"
        INSERT INTO items (org_id, name, sku, purchase_unit_id, purchase_qty, purchase_cost,
                           base_unit_id, base_qty_per_purchase)
        VALUES ($1, $2, $3, $4, 1000, 10, $4, 1000)
        RETURNING id
        "#,
    )
    .bind(org_id)
    .bind(name)
    .bind(sku)
    .bind(gram)
    .fetch_one(pool)
    .await
    .unwrap()
}
