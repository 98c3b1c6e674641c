use std::str::FromStr;

use axum::{
    extract::{FromRequest, Multipart, Request, multipart::Field},
    http::{StatusCode, header::CONTENT_TYPE},
};
use bytes::{Bytes, BytesMut};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::{
    AppState,
    config::UploadConfig,
    error::{AppError, Result},
    services::image_service::{IMAGE_FIELD, ImageUpload, check_media_type},
};

/// Admin mutation payload: text fields plus at most one image file.
///
/// Accepts `multipart/form-data`, `application/x-www-form-urlencoded` or a
/// JSON object. Form fields are kept as strings; JSON keeps its own types so
/// an explicit `null` can be told apart from an absent field.
#[derive(Debug, Default)]
pub struct AdminForm {
    pub fields: Map<String, Value>,
    pub image: Option<ImageUpload>,
}

impl FromRequest<AppState> for AdminForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return read_multipart(multipart, &state.uploads).await;
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        if content_type.starts_with("application/x-www-form-urlencoded") {
            return AdminForm::from_urlencoded(&body);
        }

        AdminForm::from_json(&body)
    }
}

async fn read_multipart(mut multipart: Multipart, uploads: &UploadConfig) -> Result<AdminForm> {
    let mut form = AdminForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let text = field.text().await.map_err(multipart_error)?;
            form.fields.insert(name, Value::String(text));
            continue;
        };

        // Browsers send an untouched file input as a part with an empty filename.
        if file_name.is_empty() {
            field.bytes().await.map_err(multipart_error)?;
            continue;
        }

        if name != IMAGE_FIELD {
            tracing::debug!("Ignoring unexpected file field {}", name);
            field.bytes().await.map_err(multipart_error)?;
            continue;
        }

        if form.image.is_some() {
            return Err(AppError::BadRequest(
                "Only one image file is allowed".to_string(),
            ));
        }

        let content_type = field.content_type().map(str::to_string);
        check_media_type(content_type.as_deref())?;

        let data = read_limited(field, uploads.max_file_size).await?;
        form.image = Some(ImageUpload {
            field_name: name,
            file_name: Some(file_name),
            content_type,
            data,
        });
    }

    Ok(form)
}

async fn read_limited(mut field: Field<'_>, limit: usize) -> Result<Bytes> {
    let mut data = BytesMut::new();

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if data.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge(format!(
                "Image exceeds the {} byte limit",
                limit
            )));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(data.freeze())
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

impl AdminForm {
    pub fn from_json(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => Ok(Self {
                fields,
                image: None,
            }),
            Ok(_) => Err(AppError::BadRequest(
                "Request body must be a JSON object".to_string(),
            )),
            Err(e) => Err(AppError::BadRequest(format!("Invalid JSON body: {}", e))),
        }
    }

    pub fn from_urlencoded(body: &[u8]) -> Result<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid form body: {}", e)))?;

        let fields = pairs
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();

        Ok(Self {
            fields,
            image: None,
        })
    }

    /// `None` when absent, `Some(None)` for an explicit null.
    pub fn raw(&self, key: &str) -> Result<Option<Option<String>>> {
        match self.fields.get(key) {
            None => Ok(None),
            Some(Value::Null) => Ok(Some(None)),
            Some(Value::String(s)) => Ok(Some(Some(s.clone()))),
            Some(Value::Number(n)) => Ok(Some(Some(n.to_string()))),
            Some(Value::Bool(b)) => Ok(Some(Some(b.to_string()))),
            Some(_) => Err(AppError::BadRequest(format!(
                "{} must be a single value",
                key
            ))),
        }
    }

    /// Nullable text: blank input counts as null.
    pub fn optional_text(&self, key: &str) -> Result<Option<Option<String>>> {
        Ok(self
            .raw(key)?
            .map(|value| value.filter(|s| !s.trim().is_empty())))
    }

    /// Non-nullable text: may be absent, but not null or blank.
    pub fn required_text(&self, key: &str) -> Result<Option<String>> {
        match self.optional_text(key)? {
            None => Ok(None),
            Some(Some(value)) => Ok(Some(value)),
            Some(None) => Err(AppError::BadRequest(format!("{} cannot be empty", key))),
        }
    }

    pub fn decimal(&self, key: &str) -> Result<Option<Decimal>> {
        self.required_text(key)?
            .map(|value| {
                Decimal::from_str(value.trim())
                    .map_err(|_| AppError::BadRequest(format!("{} must be a number", key)))
            })
            .transpose()
    }

    pub fn optional_i32(&self, key: &str) -> Result<Option<Option<i32>>> {
        let Some(value) = self.optional_text(key)? else {
            return Ok(None);
        };

        value
            .map(|value| {
                value
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| AppError::BadRequest(format!("{} must be an integer", key)))
            })
            .transpose()
            .map(Some)
    }
}
