use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::Product;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Collection {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Membership of a product in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductCollection {
    pub id: i32,
    pub product_id: i32,
    pub collection_id: i32,
    pub discount_percentage: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CollectionProduct {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub product: Product,
    pub category_name: Option<String>,
    pub discount_percentage: i32,
}

#[derive(Debug, Deserialize)]
pub struct CollectionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCollection {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionProductRequest {
    pub product_id: i32,
    pub discount_percentage: Option<i32>,
}

pub const MAX_DISCOUNT_PERCENTAGE: i32 = 100;
