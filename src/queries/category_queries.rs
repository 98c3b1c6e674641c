use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{Category, CategoryChanges, ImageChange, NewCategory},
};

/// Count all categories
pub async fn count(pool: &PgPool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Get all categories ordered by id
pub async fn get_all(pool: &PgPool) -> Result<Vec<Category>> {
    let categories =
        sqlx::query_as::<_, Category>("SELECT id, name, image_url FROM categories ORDER BY id")
            .fetch_all(pool)
            .await?;

    Ok(categories)
}

/// Find category by ID
pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, image_url FROM categories WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// Create a new category
pub async fn create_category(pool: &PgPool, req: &NewCategory) -> Result<Category> {
    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, image_url)
         VALUES ($1, $2)
         RETURNING id, name, image_url",
    )
    .bind(&req.name)
    .bind(&req.image_url)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

/// Update an existing category, touching only the supplied columns
pub async fn update_category(
    pool: &PgPool,
    id: i32,
    changes: &CategoryChanges,
) -> Result<Option<Category>> {
    if changes.is_empty() {
        return find_by_id(pool, id).await;
    }

    let mut query_builder = QueryBuilder::<Postgres>::new("UPDATE categories SET ");
    let mut has_fields = false;

    if let Some(ref name) = changes.name {
        query_builder.push("name = ");
        query_builder.push_bind(name);
        has_fields = true;
    }

    if let ImageChange::Replace(ref image_url) = changes.image_url {
        if has_fields {
            query_builder.push(", ");
        }
        query_builder.push("image_url = ");
        query_builder.push_bind(image_url);
    }

    query_builder.push(" WHERE id = ");
    query_builder.push_bind(id);
    query_builder.push(" RETURNING id, name, image_url");

    let category = query_builder
        .build_query_as::<Category>()
        .fetch_optional(pool)
        .await?;

    Ok(category)
}

/// Delete a category, returning the removed row
pub async fn delete_category(pool: &PgPool, id: i32) -> Result<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        "DELETE FROM categories WHERE id = $1 RETURNING id, name, image_url",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}
