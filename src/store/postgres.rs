use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    database,
    error::Result,
    models::{
        Category, CategoryChanges, Collection, CollectionProduct, NewCategory, NewCollection,
        NewProduct, NewReview, Product, ProductChanges, ProductCollection, ProductSort,
        ProductWithCategory, Review,
    },
    queries::{
        category_queries, collection_queries, image_queries, product_queries, review_queries,
    },
    store::Store,
};

/// PostgreSQL-backed store over a shared connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<()> {
        database::check_health(&self.pool).await
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }

    async fn count_categories(&self) -> Result<i64> {
        category_queries::count(&self.pool).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        category_queries::get_all(&self.pool).await
    }

    async fn find_category(&self, id: i32) -> Result<Option<Category>> {
        category_queries::find_by_id(&self.pool, id).await
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category> {
        category_queries::create_category(&self.pool, category).await
    }

    async fn update_category(
        &self,
        id: i32,
        changes: &CategoryChanges,
    ) -> Result<Option<Category>> {
        category_queries::update_category(&self.pool, id, changes).await
    }

    async fn delete_category(&self, id: i32) -> Result<Option<Category>> {
        category_queries::delete_category(&self.pool, id).await
    }

    async fn list_products(
        &self,
        category: Option<&str>,
        sort: ProductSort,
    ) -> Result<Vec<ProductWithCategory>> {
        product_queries::list_products(&self.pool, category, sort).await
    }

    async fn find_product(&self, id: i32) -> Result<Option<ProductWithCategory>> {
        product_queries::find_by_id(&self.pool, id).await
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        product_queries::create_product(&self.pool, product).await
    }

    async fn update_product(&self, id: i32, changes: &ProductChanges) -> Result<Option<Product>> {
        product_queries::update_product(&self.pool, id, changes).await
    }

    async fn delete_product(&self, id: i32) -> Result<Option<Product>> {
        product_queries::delete_product(&self.pool, id).await
    }

    async fn count_image_references(&self, image_url: &str) -> Result<i64> {
        image_queries::count_references(&self.pool, image_url).await
    }

    async fn list_reviews(&self) -> Result<Vec<Review>> {
        review_queries::get_all(&self.pool).await
    }

    async fn create_review(&self, review: &NewReview) -> Result<Review> {
        review_queries::create_review(&self.pool, review).await
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        collection_queries::get_all(&self.pool).await
    }

    async fn find_collection(&self, id: i32) -> Result<Option<Collection>> {
        collection_queries::find_by_id(&self.pool, id).await
    }

    async fn create_collection(&self, collection: &NewCollection) -> Result<Collection> {
        collection_queries::create_collection(&self.pool, collection).await
    }

    async fn delete_collection(&self, id: i32) -> Result<Option<Collection>> {
        collection_queries::delete_collection(&self.pool, id).await
    }

    async fn add_collection_product(
        &self,
        collection_id: i32,
        product_id: i32,
        discount_percentage: i32,
    ) -> Result<ProductCollection> {
        collection_queries::add_product(&self.pool, collection_id, product_id, discount_percentage)
            .await
    }

    async fn remove_collection_product(
        &self,
        collection_id: i32,
        product_id: i32,
    ) -> Result<Option<ProductCollection>> {
        collection_queries::remove_product(&self.pool, collection_id, product_id).await
    }

    async fn list_collection_products(
        &self,
        collection_id: i32,
    ) -> Result<Vec<CollectionProduct>> {
        collection_queries::get_products(&self.pool, collection_id).await
    }
}
