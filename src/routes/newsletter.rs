use axum::{Json, extract::rejection::JsonRejection, response::IntoResponse};
use serde_json::json;

use crate::models::NewsletterRequest;

/// Placeholder subscription: logs the address and always succeeds.
pub async fn subscribe(
    payload: std::result::Result<Json<NewsletterRequest>, JsonRejection>,
) -> impl IntoResponse {
    let email = payload.ok().and_then(|Json(req)| req.email);
    tracing::info!(
        "Newsletter subscription: {}",
        email.as_deref().unwrap_or("<none>")
    );

    Json(json!({ "message": "Successfully subscribed to newsletter!" }))
}
