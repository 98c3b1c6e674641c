use sqlx::PgPool;

use crate::error::Result;

/// Number of categories and products whose image_url is exactly `image_url`.
pub async fn count_references(pool: &PgPool, image_url: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT (SELECT COUNT(*) FROM categories WHERE image_url = $1)
             + (SELECT COUNT(*) FROM products WHERE image_url = $1)
        "#,
    )
    .bind(image_url)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
