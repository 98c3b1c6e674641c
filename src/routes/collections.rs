use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Collection, CollectionProduct},
};

pub async fn list_collections(State(state): State<AppState>) -> Result<Json<Vec<Collection>>> {
    let collections = state.store.list_collections().await?;
    Ok(Json(collections))
}

pub async fn get_collection_products(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<CollectionProduct>>> {
    if state.store.find_collection(id).await?.is_none() {
        return Err(AppError::NotFound("Collection not found".to_string()));
    }

    let products = state.store.list_collection_products(id).await?;
    Ok(Json(products))
}
