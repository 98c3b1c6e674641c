use serde::{Deserialize, Serialize};

use crate::models::ImageChange;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub image_url: Option<String>,
}

/// Partial update of a category. `None` fields are left as stored.
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub image_url: ImageChange,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.image_url.is_keep()
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkCategoryRequest {
    #[serde(default)]
    pub categories: Vec<BulkCategoryEntry>,
}

#[derive(Debug, Deserialize)]
pub struct BulkCategoryEntry {
    pub name: Option<String>,
    pub image_url: Option<String>,
}
