use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        BulkCategoryRequest, Category, CategoryChanges, Collection, CollectionProductRequest,
        CollectionRequest, ImageChange, MAX_DISCOUNT_PERCENTAGE, NewCategory, NewCollection,
        NewProduct, Product, ProductChanges, ProductCollection,
    },
    services::image_service::{
        discard_upload, resolve_for_create, resolve_for_update, save_optional, stored_file_name,
    },
    utils::extractors::AdminForm,
};

/// Drops a freshly stored upload when the row it was meant for was not written.
async fn discard_on_error<T>(
    state: &AppState,
    uploaded: Option<&str>,
    result: Result<T>,
) -> Result<T> {
    if result.is_err() {
        discard_upload(&state.uploads, uploaded).await;
    }
    result
}

/// Removes a stored upload once no category or product points at it.
async fn release_upload(state: &AppState, stored_path: Option<&str>) {
    let Some(path) = stored_path.filter(|path| stored_file_name(path).is_some()) else {
        return;
    };

    match state.store.count_image_references(path).await {
        Ok(0) => discard_upload(&state.uploads, Some(path)).await,
        Ok(count) => tracing::debug!("Keeping upload {} with {} references", path, count),
        Err(e) => tracing::warn!("Could not check references to {}: {}", path, e),
    }
}

async fn ensure_category_exists(state: &AppState, category_id: Option<i32>) -> Result<()> {
    if let Some(id) = category_id {
        if state.store.find_category(id).await?.is_none() {
            return Err(AppError::BadRequest(format!(
                "Category with id {} does not exist",
                id
            )));
        }
    }
    Ok(())
}

fn check_price(price: Option<Decimal>) -> Result<Option<Decimal>> {
    match price {
        Some(price) if price.is_sign_negative() => {
            Err(AppError::BadRequest("price cannot be negative".to_string()))
        }
        other => Ok(other),
    }
}

//PRODUCT ROUTES
pub async fn create_product(
    State(state): State<AppState>,
    form: AdminForm,
) -> Result<(StatusCode, Json<Product>)> {
    let name = form
        .required_text("name")?
        .ok_or_else(|| AppError::BadRequest("name is required".to_string()))?;
    let price = check_price(form.decimal("price")?)?
        .ok_or_else(|| AppError::BadRequest("price is required".to_string()))?;
    let category_id = form.optional_i32("category_id")?.flatten();
    let description = form.optional_text("description")?.flatten();
    let image_url = form.optional_text("image_url")?;

    ensure_category_exists(&state, category_id).await?;

    let uploaded = save_optional(&state.uploads, form.image.as_ref()).await?;
    let product = NewProduct {
        name,
        price,
        image_url: resolve_for_create(uploaded.clone(), image_url),
        category_id,
        description,
    };

    let result = state.store.create_product(&product).await;
    let product = discard_on_error(&state, uploaded.as_deref(), result).await?;

    tracing::info!("Created product {} ({})", product.id, product.name);

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    form: AdminForm,
) -> Result<Json<Product>> {
    let mut changes = ProductChanges {
        name: form.required_text("name")?,
        price: check_price(form.decimal("price")?)?,
        category_id: form.optional_i32("category_id")?,
        description: form.optional_text("description")?,
        image_url: ImageChange::Keep,
    };
    let image_url = form.optional_text("image_url")?;

    let previous = state
        .store
        .find_product(id)
        .await?
        .ok_or(AppError::NotFound("Product not found".to_string()))?
        .product
        .image_url;

    if let Some(category_id) = changes.category_id {
        ensure_category_exists(&state, category_id).await?;
    }

    let uploaded = save_optional(&state.uploads, form.image.as_ref()).await?;
    changes.image_url = resolve_for_update(uploaded.clone(), image_url);

    let result = state
        .store
        .update_product(id, &changes)
        .await
        .and_then(|product| product.ok_or(AppError::NotFound("Product not found".to_string())));
    let product = discard_on_error(&state, uploaded.as_deref(), result).await?;

    if product.image_url != previous {
        release_upload(&state, previous.as_deref()).await;
    }

    tracing::info!("Updated product {}", product.id);

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = state
        .store
        .delete_product(id)
        .await?
        .ok_or(AppError::NotFound("Product not found".to_string()))?;

    release_upload(&state, product.image_url.as_deref()).await;
    tracing::info!("Deleted product {}", product.id);

    Ok(Json(product))
}

//CATEGORY ROUTES
pub async fn create_category(
    State(state): State<AppState>,
    form: AdminForm,
) -> Result<(StatusCode, Json<Category>)> {
    let name = form
        .required_text("name")?
        .ok_or_else(|| AppError::BadRequest("name is required".to_string()))?;
    let image_url = form.optional_text("image_url")?;

    let uploaded = save_optional(&state.uploads, form.image.as_ref()).await?;
    let category = NewCategory {
        name,
        image_url: resolve_for_create(uploaded.clone(), image_url),
    };

    let result = state.store.create_category(&category).await;
    let category = discard_on_error(&state, uploaded.as_deref(), result).await?;

    tracing::info!("Created category {} ({})", category.id, category.name);

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    form: AdminForm,
) -> Result<Json<Category>> {
    let name = form.required_text("name")?;
    let image_url = form.optional_text("image_url")?;

    let previous = state
        .store
        .find_category(id)
        .await?
        .ok_or(AppError::NotFound("Category not found".to_string()))?
        .image_url;

    let uploaded = save_optional(&state.uploads, form.image.as_ref()).await?;
    let changes = CategoryChanges {
        name,
        image_url: resolve_for_update(uploaded.clone(), image_url),
    };

    let result = state
        .store
        .update_category(id, &changes)
        .await
        .and_then(|category| {
            category.ok_or(AppError::NotFound("Category not found".to_string()))
        });
    let category = discard_on_error(&state, uploaded.as_deref(), result).await?;

    if category.image_url != previous {
        release_upload(&state, previous.as_deref()).await;
    }

    tracing::info!("Updated category {}", category.id);

    Ok(Json(category))
}

/// Inserts one at a time; rows created before a failing entry stay committed.
pub async fn bulk_create_categories(
    State(state): State<AppState>,
    Json(payload): Json<BulkCategoryRequest>,
) -> Result<(StatusCode, Json<Vec<Category>>)> {
    let mut created = Vec::with_capacity(payload.categories.len());

    for (index, entry) in payload.categories.into_iter().enumerate() {
        let name = entry
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                AppError::BadRequest(format!("categories[{}].name is required", index))
            })?;

        let category = state
            .store
            .create_category(&NewCategory {
                name,
                image_url: entry.image_url.filter(|url| !url.trim().is_empty()),
            })
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    "Bulk category insert stopped at entry {} after {} rows: {}",
                    index,
                    created.len(),
                    e
                )
            })?;

        created.push(category);
    }

    tracing::info!("Bulk created {} categories", created.len());

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Category>> {
    let category = state
        .store
        .delete_category(id)
        .await?
        .ok_or(AppError::NotFound("Category not found".to_string()))?;

    release_upload(&state, category.image_url.as_deref()).await;
    tracing::info!("Deleted category {}", category.id);

    Ok(Json(category))
}

//COLLECTION ROUTES
pub async fn create_collection(
    State(state): State<AppState>,
    Json(payload): Json<CollectionRequest>,
) -> Result<(StatusCode, Json<Collection>)> {
    let name = payload
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("name is required".to_string()))?;

    let collection = state
        .store
        .create_collection(&NewCollection {
            name,
            description: payload.description.filter(|d| !d.trim().is_empty()),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(collection)))
}

pub async fn delete_collection(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Collection>> {
    let collection = state
        .store
        .delete_collection(id)
        .await?
        .ok_or(AppError::NotFound("Collection not found".to_string()))?;

    Ok(Json(collection))
}

pub async fn add_collection_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CollectionProductRequest>,
) -> Result<(StatusCode, Json<ProductCollection>)> {
    let discount = payload.discount_percentage.unwrap_or(0);
    if !(0..=MAX_DISCOUNT_PERCENTAGE).contains(&discount) {
        return Err(AppError::BadRequest(format!(
            "discount_percentage must be between 0 and {}",
            MAX_DISCOUNT_PERCENTAGE
        )));
    }

    if state.store.find_collection(id).await?.is_none() {
        return Err(AppError::NotFound("Collection not found".to_string()));
    }

    if state.store.find_product(payload.product_id).await?.is_none() {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    let membership = state
        .store
        .add_collection_product(id, payload.product_id, discount)
        .await?;

    Ok((StatusCode::CREATED, Json(membership)))
}

pub async fn remove_collection_product(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(i32, i32)>,
) -> Result<Json<ProductCollection>> {
    let membership = state
        .store
        .remove_collection_product(id, product_id)
        .await?
        .ok_or(AppError::NotFound(
            "Product is not in this collection".to_string(),
        ))?;

    Ok(Json(membership))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn negative_price_is_rejected() {
        assert!(check_price(Some(dec!(-1))).is_err());
        assert_eq!(check_price(Some(dec!(0))).unwrap(), Some(dec!(0)));
        assert_eq!(check_price(None).unwrap(), None);
    }
}
