use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{ImageChange, NewProduct, Product, ProductChanges, ProductSort, ProductWithCategory},
};

const PRODUCT_COLUMNS: &str =
    "id, name, price, image_url, category_id, rating, description, created_at";

const JOINED_SELECT: &str = "SELECT p.id, p.name, p.price, p.image_url, p.category_id, p.rating, \
     p.description, p.created_at, c.name AS category_name \
     FROM products p \
     LEFT JOIN categories c ON p.category_id = c.id";

pub async fn list_products(
    pool: &PgPool,
    category: Option<&str>,
    sort: ProductSort,
) -> Result<Vec<ProductWithCategory>> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(JOINED_SELECT);

    if let Some(category) = category {
        query.push(" WHERE c.name = ");
        query.push_bind(category);
    }

    query.push(" ORDER BY ");
    query.push(sort.order_by());

    let products = query
        .build_query_as::<ProductWithCategory>()
        .fetch_all(pool)
        .await?;

    Ok(products)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<ProductWithCategory>> {
    let product = sqlx::query_as::<_, ProductWithCategory>(&format!(
        "{} WHERE p.id = $1",
        JOINED_SELECT
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

async fn find_row(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM products WHERE id = $1",
        PRODUCT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn create_product(pool: &PgPool, req: &NewProduct) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(&format!(
        r#"
        INSERT INTO products (name, price, image_url, category_id, description)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        PRODUCT_COLUMNS
    ))
    .bind(&req.name)
    .bind(req.price)
    .bind(&req.image_url)
    .bind(req.category_id)
    .bind(&req.description)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn update_product(
    pool: &PgPool,
    id: i32,
    changes: &ProductChanges,
) -> Result<Option<Product>> {
    if changes.is_empty() {
        return find_row(pool, id).await;
    }

    let mut query_builder = QueryBuilder::<Postgres>::new("UPDATE products SET ");
    let mut set = query_builder.separated(", ");

    if let Some(ref name) = changes.name {
        set.push("name = ");
        set.push_bind_unseparated(name);
    }

    if let Some(price) = changes.price {
        set.push("price = ");
        set.push_bind_unseparated(price);
    }

    if let Some(category_id) = changes.category_id {
        set.push("category_id = ");
        set.push_bind_unseparated(category_id);
    }

    if let Some(ref description) = changes.description {
        set.push("description = ");
        set.push_bind_unseparated(description);
    }

    if let ImageChange::Replace(ref image_url) = changes.image_url {
        set.push("image_url = ");
        set.push_bind_unseparated(image_url);
    }

    query_builder.push(" WHERE id = ");
    query_builder.push_bind(id);
    query_builder.push(" RETURNING ");
    query_builder.push(PRODUCT_COLUMNS);

    let product = query_builder
        .build_query_as::<Product>()
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn delete_product(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "DELETE FROM products WHERE id = $1 RETURNING {}",
        PRODUCT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}
