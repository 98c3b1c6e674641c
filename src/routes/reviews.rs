use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{MAX_REVIEW_RATING, MIN_REVIEW_RATING, NewReview, Review, ReviewRequest},
};

pub async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Review>>> {
    let reviews = state.store.list_reviews().await?;
    Ok(Json(reviews))
}

pub async fn create_review(
    State(state): State<AppState>,
    Json(payload): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<Review>)> {
    let review = validate_review(payload)?;
    let review = state.store.create_review(&review).await?;

    Ok((StatusCode::CREATED, Json(review)))
}

fn validate_review(payload: ReviewRequest) -> Result<NewReview> {
    let name = payload
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("name is required".to_string()))?;

    if let Some(rating) = payload.rating {
        if !(MIN_REVIEW_RATING..=MAX_REVIEW_RATING).contains(&rating) {
            return Err(AppError::BadRequest(format!(
                "rating must be between {} and {}",
                MIN_REVIEW_RATING, MAX_REVIEW_RATING
            )));
        }
    }

    Ok(NewReview {
        name,
        role: payload.role,
        review_text: payload.review_text,
        rating: payload.rating,
        image_url: payload.image_url.filter(|url| !url.trim().is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: Option<&str>, rating: Option<i32>) -> ReviewRequest {
        ReviewRequest {
            name: name.map(str::to_string),
            role: None,
            review_text: Some("Great fit".to_string()),
            rating,
            image_url: Some(String::new()),
        }
    }

    #[test]
    fn rating_outside_range_is_rejected() {
        assert!(matches!(
            validate_review(request(Some("Ann"), Some(6))),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validate_review(request(Some("Ann"), Some(0))),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn missing_rating_is_allowed() {
        let review = validate_review(request(Some("Ann"), None)).unwrap();
        assert_eq!(review.rating, None);
        assert_eq!(review.image_url, None);
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(validate_review(request(Some(" "), Some(4))).is_err());
        assert!(validate_review(request(None, Some(4))).is_err());
    }
}
