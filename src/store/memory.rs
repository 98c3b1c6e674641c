use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::{
    error::{AppError, Result},
    models::{
        Category, CategoryChanges, Collection, CollectionProduct, MAX_REVIEW_RATING,
        MIN_REVIEW_RATING, NewCategory, NewCollection, NewProduct, NewReview, Product,
        ProductChanges, ProductCollection, ProductSort, ProductWithCategory, Review,
    },
    store::Store,
};

const CATEGORY_NAME_MAX: usize = 100;
const PRODUCT_NAME_MAX: usize = 255;
const REVIEW_NAME_MAX: usize = 100;
const COLLECTION_NAME_MAX: usize = 100;

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    products: Vec<Product>,
    reviews: Vec<Review>,
    collections: Vec<Collection>,
    product_collections: Vec<ProductCollection>,
    sequences: Sequences,
}

/// Mirrors Postgres SERIAL columns: ids are never reused after a delete.
#[derive(Default)]
struct Sequences {
    categories: i32,
    products: i32,
    reviews: i32,
    collections: i32,
    product_collections: i32,
}

fn next(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Matches the rounding of a NUMERIC(p, scale) column.
fn with_scale(value: Decimal, scale: u32) -> Decimal {
    let mut value = value;
    value.rescale(scale);
    value
}

fn check_length(column: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "value too long for {} (max {} characters)",
            column, max
        )));
    }
    Ok(())
}

impl Tables {
    fn category_name(&self, id: Option<i32>) -> Option<String> {
        id.and_then(|id| self.categories.iter().find(|c| c.id == id))
            .map(|c| c.name.clone())
    }

    fn check_category_ref(&self, category_id: Option<i32>) -> Result<()> {
        match category_id {
            Some(id) if !self.categories.iter().any(|c| c.id == id) => Err(AppError::Conflict(
                format!("category {} is not present in table \"categories\"", id),
            )),
            _ => Ok(()),
        }
    }

    fn joined(&self, product: &Product) -> ProductWithCategory {
        ProductWithCategory {
            category_name: self.category_name(product.category_id),
            product: product.clone(),
        }
    }
}

/// In-process store with the same constraint behaviour as the Postgres schema.
///
/// Used by tests and local runs without a database.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a product's rating, which no API writes. Returns false for an unknown id.
    pub async fn set_product_rating(&self, id: i32, rating: Decimal) -> bool {
        let mut tables = self.tables.lock().await;
        match tables.products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                product.rating = with_scale(rating, 1);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) {}

    async fn count_categories(&self) -> Result<i64> {
        Ok(self.tables.lock().await.categories.len() as i64)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.tables.lock().await.categories.clone())
    }

    async fn find_category(&self, id: i32) -> Result<Option<Category>> {
        let tables = self.tables.lock().await;
        Ok(tables.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category> {
        check_length("categories.name", &category.name, CATEGORY_NAME_MAX)?;

        let mut tables = self.tables.lock().await;
        let row = Category {
            id: next(&mut tables.sequences.categories),
            name: category.name.clone(),
            image_url: category.image_url.clone(),
        };
        tables.categories.push(row.clone());
        Ok(row)
    }

    async fn update_category(
        &self,
        id: i32,
        changes: &CategoryChanges,
    ) -> Result<Option<Category>> {
        if let Some(ref name) = changes.name {
            check_length("categories.name", name, CATEGORY_NAME_MAX)?;
        }

        let mut tables = self.tables.lock().await;
        let Some(row) = tables.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(ref name) = changes.name {
            row.name = name.clone();
        }
        changes.image_url.apply(&mut row.image_url);

        Ok(Some(row.clone()))
    }

    async fn delete_category(&self, id: i32) -> Result<Option<Category>> {
        let mut tables = self.tables.lock().await;
        let Some(index) = tables.categories.iter().position(|c| c.id == id) else {
            return Ok(None);
        };

        if tables.products.iter().any(|p| p.category_id == Some(id)) {
            return Err(AppError::Conflict(format!(
                "category {} is still referenced from table \"products\"",
                id
            )));
        }

        Ok(Some(tables.categories.remove(index)))
    }

    async fn list_products(
        &self,
        category: Option<&str>,
        sort: ProductSort,
    ) -> Result<Vec<ProductWithCategory>> {
        let tables = self.tables.lock().await;

        let mut rows: Vec<ProductWithCategory> = tables
            .products
            .iter()
            .map(|p| tables.joined(p))
            .filter(|row| match category {
                Some(name) => row.category_name.as_deref() == Some(name),
                None => true,
            })
            .collect();

        rows.sort_by_key(|row| row.product.id);
        match sort {
            ProductSort::BestSelling | ProductSort::TopRating => {
                rows.sort_by(|a, b| b.product.rating.cmp(&a.product.rating));
            }
            ProductSort::Id => {}
        }

        Ok(rows)
    }

    async fn find_product(&self, id: i32) -> Result<Option<ProductWithCategory>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| tables.joined(p)))
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        check_length("products.name", &product.name, PRODUCT_NAME_MAX)?;

        let mut tables = self.tables.lock().await;
        tables.check_category_ref(product.category_id)?;

        let row = Product {
            id: next(&mut tables.sequences.products),
            name: product.name.clone(),
            price: with_scale(product.price, 2),
            image_url: product.image_url.clone(),
            category_id: product.category_id,
            rating: Decimal::new(50, 1),
            description: product.description.clone(),
            created_at: now(),
        };
        tables.products.push(row.clone());
        Ok(row)
    }

    async fn update_product(&self, id: i32, changes: &ProductChanges) -> Result<Option<Product>> {
        if let Some(ref name) = changes.name {
            check_length("products.name", name, PRODUCT_NAME_MAX)?;
        }

        let mut tables = self.tables.lock().await;
        if let Some(category_id) = changes.category_id {
            tables.check_category_ref(category_id)?;
        }

        let Some(row) = tables.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(ref name) = changes.name {
            row.name = name.clone();
        }
        if let Some(price) = changes.price {
            row.price = with_scale(price, 2);
        }
        if let Some(category_id) = changes.category_id {
            row.category_id = category_id;
        }
        if let Some(ref description) = changes.description {
            row.description = description.clone();
        }
        changes.image_url.apply(&mut row.image_url);

        Ok(Some(row.clone()))
    }

    async fn delete_product(&self, id: i32) -> Result<Option<Product>> {
        let mut tables = self.tables.lock().await;
        let Some(index) = tables.products.iter().position(|p| p.id == id) else {
            return Ok(None);
        };

        let removed = tables.products.remove(index);
        tables.product_collections.retain(|pc| pc.product_id != id);
        Ok(Some(removed))
    }

    async fn count_image_references(&self, image_url: &str) -> Result<i64> {
        let tables = self.tables.lock().await;
        let categories = tables
            .categories
            .iter()
            .filter(|c| c.image_url.as_deref() == Some(image_url))
            .count();
        let products = tables
            .products
            .iter()
            .filter(|p| p.image_url.as_deref() == Some(image_url))
            .count();
        Ok((categories + products) as i64)
    }

    async fn list_reviews(&self) -> Result<Vec<Review>> {
        let mut reviews = self.tables.lock().await.reviews.clone();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(reviews)
    }

    async fn create_review(&self, review: &NewReview) -> Result<Review> {
        check_length("reviews.name", &review.name, REVIEW_NAME_MAX)?;
        if let Some(rating) = review.rating {
            if !(MIN_REVIEW_RATING..=MAX_REVIEW_RATING).contains(&rating) {
                return Err(AppError::BadRequest(
                    "new row for relation \"reviews\" violates check constraint \"reviews_rating_check\""
                        .to_string(),
                ));
            }
        }

        let mut tables = self.tables.lock().await;
        let row = Review {
            id: next(&mut tables.sequences.reviews),
            name: review.name.clone(),
            role: review.role.clone(),
            review_text: review.review_text.clone(),
            rating: review.rating,
            image_url: review.image_url.clone(),
            created_at: now(),
        };
        tables.reviews.push(row.clone());
        Ok(row)
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        Ok(self.tables.lock().await.collections.clone())
    }

    async fn find_collection(&self, id: i32) -> Result<Option<Collection>> {
        let tables = self.tables.lock().await;
        Ok(tables.collections.iter().find(|c| c.id == id).cloned())
    }

    async fn create_collection(&self, collection: &NewCollection) -> Result<Collection> {
        check_length("collections.name", &collection.name, COLLECTION_NAME_MAX)?;

        let mut tables = self.tables.lock().await;
        let row = Collection {
            id: next(&mut tables.sequences.collections),
            name: collection.name.clone(),
            description: collection.description.clone(),
            created_at: now(),
        };
        tables.collections.push(row.clone());
        Ok(row)
    }

    async fn delete_collection(&self, id: i32) -> Result<Option<Collection>> {
        let mut tables = self.tables.lock().await;
        let Some(index) = tables.collections.iter().position(|c| c.id == id) else {
            return Ok(None);
        };

        let removed = tables.collections.remove(index);
        tables.product_collections.retain(|pc| pc.collection_id != id);
        Ok(Some(removed))
    }

    async fn add_collection_product(
        &self,
        collection_id: i32,
        product_id: i32,
        discount_percentage: i32,
    ) -> Result<ProductCollection> {
        let mut tables = self.tables.lock().await;

        if !tables.collections.iter().any(|c| c.id == collection_id)
            || !tables.products.iter().any(|p| p.id == product_id)
        {
            return Err(AppError::Conflict(
                "insert on table \"product_collections\" violates foreign key constraint"
                    .to_string(),
            ));
        }

        if tables
            .product_collections
            .iter()
            .any(|pc| pc.collection_id == collection_id && pc.product_id == product_id)
        {
            return Err(AppError::Conflict(format!(
                "product {} is already in collection {}",
                product_id, collection_id
            )));
        }

        let row = ProductCollection {
            id: next(&mut tables.sequences.product_collections),
            product_id,
            collection_id,
            discount_percentage,
            created_at: now(),
        };
        tables.product_collections.push(row.clone());
        Ok(row)
    }

    async fn remove_collection_product(
        &self,
        collection_id: i32,
        product_id: i32,
    ) -> Result<Option<ProductCollection>> {
        let mut tables = self.tables.lock().await;
        let Some(index) = tables
            .product_collections
            .iter()
            .position(|pc| pc.collection_id == collection_id && pc.product_id == product_id)
        else {
            return Ok(None);
        };

        Ok(Some(tables.product_collections.remove(index)))
    }

    async fn list_collection_products(
        &self,
        collection_id: i32,
    ) -> Result<Vec<CollectionProduct>> {
        let tables = self.tables.lock().await;

        let mut rows: Vec<CollectionProduct> = tables
            .product_collections
            .iter()
            .filter(|pc| pc.collection_id == collection_id)
            .filter_map(|pc| {
                let product = tables.products.iter().find(|p| p.id == pc.product_id)?;
                Some(CollectionProduct {
                    product: product.clone(),
                    category_name: tables.category_name(product.category_id),
                    discount_percentage: pc.discount_percentage,
                })
            })
            .collect();
        rows.sort_by_key(|row| row.product.id);

        Ok(rows)
    }
}
