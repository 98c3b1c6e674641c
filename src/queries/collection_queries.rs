use sqlx::PgPool;

use crate::{
    error::Result,
    models::{Collection, CollectionProduct, NewCollection, ProductCollection},
};

pub async fn get_all(pool: &PgPool) -> Result<Vec<Collection>> {
    let collections = sqlx::query_as::<_, Collection>(
        "SELECT id, name, description, created_at FROM collections ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(collections)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Collection>> {
    let collection = sqlx::query_as::<_, Collection>(
        "SELECT id, name, description, created_at FROM collections WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(collection)
}

pub async fn create_collection(pool: &PgPool, req: &NewCollection) -> Result<Collection> {
    let collection = sqlx::query_as::<_, Collection>(
        "INSERT INTO collections (name, description)
         VALUES ($1, $2)
         RETURNING id, name, description, created_at",
    )
    .bind(&req.name)
    .bind(&req.description)
    .fetch_one(pool)
    .await?;

    Ok(collection)
}

pub async fn delete_collection(pool: &PgPool, id: i32) -> Result<Option<Collection>> {
    let collection = sqlx::query_as::<_, Collection>(
        "DELETE FROM collections WHERE id = $1 RETURNING id, name, description, created_at",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(collection)
}

pub async fn add_product(
    pool: &PgPool,
    collection_id: i32,
    product_id: i32,
    discount_percentage: i32,
) -> Result<ProductCollection> {
    let membership = sqlx::query_as::<_, ProductCollection>(
        r#"
        INSERT INTO product_collections (product_id, collection_id, discount_percentage)
        VALUES ($1, $2, $3)
        RETURNING id, product_id, collection_id, discount_percentage, created_at
        "#,
    )
    .bind(product_id)
    .bind(collection_id)
    .bind(discount_percentage)
    .fetch_one(pool)
    .await?;

    Ok(membership)
}

pub async fn remove_product(
    pool: &PgPool,
    collection_id: i32,
    product_id: i32,
) -> Result<Option<ProductCollection>> {
    let membership = sqlx::query_as::<_, ProductCollection>(
        r#"
        DELETE FROM product_collections
        WHERE collection_id = $1 AND product_id = $2
        RETURNING id, product_id, collection_id, discount_percentage, created_at
        "#,
    )
    .bind(collection_id)
    .bind(product_id)
    .fetch_optional(pool)
    .await?;

    Ok(membership)
}

pub async fn get_products(pool: &PgPool, collection_id: i32) -> Result<Vec<CollectionProduct>> {
    let products = sqlx::query_as::<_, CollectionProduct>(
        "SELECT p.id, p.name, p.price, p.image_url, p.category_id, p.rating,
                p.description, p.created_at, c.name AS category_name,
                pc.discount_percentage
         FROM product_collections pc
         INNER JOIN products p ON pc.product_id = p.id
         LEFT JOIN categories c ON p.category_id = c.id
         WHERE pc.collection_id = $1
         ORDER BY p.id",
    )
    .bind(collection_id)
    .fetch_all(pool)
    .await?;

    Ok(products)
}
