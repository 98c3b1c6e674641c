use axum::{Json, extract::State};

use crate::{AppState, error::Result, models::Category};

pub async fn get_all_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = state.store.list_categories().await?;
    Ok(Json(categories))
}
