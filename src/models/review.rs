use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: i32,
    pub name: String,
    pub role: Option<String>,
    pub review_text: Option<String>,
    pub rating: Option<i32>,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub review_text: Option<String>,
    pub rating: Option<i32>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub name: String,
    pub role: Option<String>,
    pub review_text: Option<String>,
    pub rating: Option<i32>,
    pub image_url: Option<String>,
}

pub const MIN_REVIEW_RATING: i32 = 1;
pub const MAX_REVIEW_RATING: i32 = 5;
