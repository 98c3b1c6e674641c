use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::ImageChange;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category_id: Option<i32>,
    pub rating: Decimal,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Product row joined with the name of its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductWithCategory {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub product: Product,
    pub category_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Rating descending, ties by id ascending.
    BestSelling,
    /// Rating descending.
    TopRating,
    #[default]
    Id,
}

impl ProductSort {
    /// Unrecognised filters fall back to id order.
    pub fn from_filter(filter: Option<&str>) -> Self {
        match filter {
            Some("best-selling") => ProductSort::BestSelling,
            Some("top-rating") => ProductSort::TopRating,
            _ => ProductSort::Id,
        }
    }

    pub fn order_by(&self) -> &'static str {
        match self {
            ProductSort::BestSelling => "p.rating DESC, p.id ASC",
            ProductSort::TopRating => "p.rating DESC, p.id ASC",
            ProductSort::Id => "p.id ASC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category_id: Option<i32>,
    pub description: Option<String>,
}

/// Partial update of a product.
///
/// Outer `None` leaves a column as stored; for nullable columns
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category_id: Option<Option<i32>>,
    pub description: Option<Option<String>>,
    pub image_url: ImageChange,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.category_id.is_none()
            && self.description.is_none()
            && self.image_url.is_keep()
    }
}
