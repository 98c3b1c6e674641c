use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{ProductQuery, ProductSort, ProductWithCategory},
};

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductQuery>,
) -> Result<Json<Vec<ProductWithCategory>>> {
    let sort = ProductSort::from_filter(params.filter.as_deref());
    let category = params.category.as_deref().filter(|c| !c.is_empty());

    let products = state.store.list_products(category, sort).await?;

    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductWithCategory>> {
    let product = state
        .store
        .find_product(id)
        .await?
        .ok_or(AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}
