mod admin;
mod categories;
mod collections;
mod health;
mod newsletter;
mod products;
mod reviews;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/api", public_routes())
        .nest("/api/admin", admin_routes())
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories::get_all_categories))
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::get_product))
        .route(
            "/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route("/newsletter", post(newsletter::subscribe))
        .route("/collections", get(collections::list_collections))
        .route(
            "/collections/{id}/products",
            get(collections::get_collection_products),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(admin::create_product))
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/categories", post(admin::create_category))
        .route("/categories/bulk", post(admin::bulk_create_categories))
        .route(
            "/categories/{id}",
            put(admin::update_category).delete(admin::delete_category),
        )
        .route("/collections", post(admin::create_collection))
        .route("/collections/{id}", delete(admin::delete_collection))
        .route(
            "/collections/{id}/products",
            post(admin::add_collection_product),
        )
        .route(
            "/collections/{id}/products/{product_id}",
            delete(admin::remove_collection_product),
        )
}
