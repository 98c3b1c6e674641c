mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{
        Category, CategoryChanges, Collection, CollectionProduct, NewCategory, NewCollection,
        NewProduct, NewReview, Product, ProductChanges, ProductCollection, ProductSort,
        ProductWithCategory, Review,
    },
};

/// Store defines the catalog persistence interface handed to every handler.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<()>;

    /// Releases pooled connections. Called once on shutdown.
    async fn close(&self);

    // Category operations
    async fn count_categories(&self) -> Result<i64>;
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn find_category(&self, id: i32) -> Result<Option<Category>>;
    async fn create_category(&self, category: &NewCategory) -> Result<Category>;
    async fn update_category(
        &self,
        id: i32,
        changes: &CategoryChanges,
    ) -> Result<Option<Category>>;
    async fn delete_category(&self, id: i32) -> Result<Option<Category>>;

    // Product operations
    async fn list_products(
        &self,
        category: Option<&str>,
        sort: ProductSort,
    ) -> Result<Vec<ProductWithCategory>>;
    async fn find_product(&self, id: i32) -> Result<Option<ProductWithCategory>>;
    async fn create_product(&self, product: &NewProduct) -> Result<Product>;
    async fn update_product(&self, id: i32, changes: &ProductChanges) -> Result<Option<Product>>;
    async fn delete_product(&self, id: i32) -> Result<Option<Product>>;

    /// Categories and products still pointing at `image_url`.
    async fn count_image_references(&self, image_url: &str) -> Result<i64>;

    // Review operations
    async fn list_reviews(&self) -> Result<Vec<Review>>;
    async fn create_review(&self, review: &NewReview) -> Result<Review>;

    // Collection operations (many-to-many with products)
    async fn list_collections(&self) -> Result<Vec<Collection>>;
    async fn find_collection(&self, id: i32) -> Result<Option<Collection>>;
    async fn create_collection(&self, collection: &NewCollection) -> Result<Collection>;
    async fn delete_collection(&self, id: i32) -> Result<Option<Collection>>;
    async fn add_collection_product(
        &self,
        collection_id: i32,
        product_id: i32,
        discount_percentage: i32,
    ) -> Result<ProductCollection>;
    async fn remove_collection_product(
        &self,
        collection_id: i32,
        product_id: i32,
    ) -> Result<Option<ProductCollection>>;
    async fn list_collection_products(&self, collection_id: i32)
    -> Result<Vec<CollectionProduct>>;
}
