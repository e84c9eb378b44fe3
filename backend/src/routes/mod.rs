//! Route definitions for the Kitchen Costing Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
///
/// Protected routers take the state so the auth middleware can read the
/// token secret from it.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public except /me)
        .nest("/auth", auth_routes(state.clone()))
        // Reference data
        .route("/units", get(handlers::list_units))
        .nest("/categories", category_routes(state.clone()))
        .nest("/items", item_routes(state.clone()))
        .nest("/recipes", recipe_routes(state.clone()))
        .nest("/products", product_routes(state.clone()))
        .nest("/employees", employee_routes(state.clone()))
        .nest("/dashboard", dashboard_routes(state))
}

fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register-owner", post(handlers::register_owner))
        .route("/login", post(handlers::login))
        .merge(protected)
}

fn category_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_categories).post(handlers::create_category))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn item_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_items).post(handlers::create_item))
        .route(
            "/:item_id",
            get(handlers::get_item)
                .patch(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn recipe_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_recipes).post(handlers::create_recipe))
        .route(
            "/:recipe_id",
            get(handlers::get_recipe)
                .patch(handlers::update_recipe)
                .delete(handlers::delete_recipe),
        )
        .route("/:recipe_id/items", get(handlers::list_recipe_items))
        .route(
            "/:recipe_id/items/:item_id",
            put(handlers::upsert_recipe_item).delete(handlers::remove_recipe_item),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .patch(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/recipes", get(handlers::list_product_recipes))
        .route(
            "/:product_id/recipes/:recipe_id",
            put(handlers::upsert_product_recipe).delete(handlers::remove_product_recipe),
        )
        .route("/:product_id/items", get(handlers::list_product_items))
        .route(
            "/:product_id/items/:item_id",
            put(handlers::upsert_product_item).delete(handlers::remove_product_item),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn employee_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_employees).post(handlers::create_employee))
        .route(
            "/:employee_id",
            get(handlers::get_employee)
                .patch(handlers::update_employee)
                .delete(handlers::delete_employee),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn dashboard_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
