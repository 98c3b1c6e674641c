use sqlx::PgPool;

use crate::{
    error::Result,
    models::{NewReview, Review},
};

pub async fn get_all(pool: &PgPool) -> Result<Vec<Review>> {
    let reviews = sqlx::query_as::<_, Review>(
        "SELECT id, name, role, review_text, rating, image_url, created_at
         FROM reviews
         ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}

pub async fn create_review(pool: &PgPool, req: &NewReview) -> Result<Review> {
    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (name, role, review_text, rating, image_url)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, role, review_text, rating, image_url, created_at
        "#,
    )
    .bind(&req.name)
    .bind(&req.role)
    .bind(&req.review_text)
    .bind(req.rating)
    .bind(&req.image_url)
    .fetch_one(pool)
    .await?;

    Ok(review)
}
