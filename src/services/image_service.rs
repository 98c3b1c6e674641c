use std::path::Path;

use bytes::Bytes;
use chrono::Utc;
use rand::Rng;

use crate::{
    config::UploadConfig,
    error::{AppError, Result},
    models::ImageChange,
};

/// URL prefix under which stored uploads are served.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Multipart field that carries the image file.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub field_name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

pub fn is_image_media_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false)
}

pub fn check_media_type(content_type: Option<&str>) -> Result<()> {
    if is_image_media_type(content_type) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Only image files are allowed!".to_string(),
        ))
    }
}

/// `<field>-<unix millis>-<random>.<ext>`, keeping the original extension.
pub fn generate_file_name(field_name: &str, original_name: Option<&str>) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();

    format!("{}-{}-{}{}", field_name, millis, suffix, extension)
}

pub fn public_path(file_name: &str) -> String {
    format!("{}/{}", UPLOADS_ROUTE, file_name)
}

/// Writes the upload into the upload directory and returns its public path.
pub async fn save_upload(config: &UploadConfig, upload: &ImageUpload) -> Result<String> {
    check_media_type(upload.content_type.as_deref())?;

    if upload.data.len() > config.max_file_size {
        return Err(AppError::PayloadTooLarge(format!(
            "Image exceeds the {} byte limit",
            config.max_file_size
        )));
    }

    let file_name = generate_file_name(&upload.field_name, upload.file_name.as_deref());

    tokio::fs::create_dir_all(&config.dir).await?;
    tokio::fs::write(config.dir.join(&file_name), &upload.data).await?;

    tracing::info!(
        "Stored upload {} ({} bytes)",
        file_name,
        upload.data.len()
    );

    Ok(public_path(&file_name))
}

pub async fn save_optional(
    config: &UploadConfig,
    upload: Option<&ImageUpload>,
) -> Result<Option<String>> {
    match upload {
        Some(upload) => Ok(Some(save_upload(config, upload).await?)),
        None => Ok(None),
    }
}

/// File name inside the upload directory for a `/uploads/<name>` reference.
/// External URLs and anything that could escape the directory yield `None`.
pub fn stored_file_name(path: &str) -> Option<&str> {
    path.strip_prefix(UPLOADS_ROUTE)?
        .strip_prefix('/')
        .filter(|name| !name.is_empty() && !name.contains('/') && !name.contains(".."))
}

/// Removes a stored upload; references outside the upload directory are left alone.
pub async fn discard_upload(config: &UploadConfig, stored_path: Option<&str>) {
    let Some(file_name) = stored_path.and_then(stored_file_name) else {
        return;
    };

    if let Err(e) = tokio::fs::remove_file(config.dir.join(file_name)).await {
        tracing::warn!("Failed to remove upload {}: {}", file_name, e);
    }
}

/// Image reference for a new row: uploaded file, then a non-blank URL, then none.
pub fn resolve_for_create(
    uploaded_path: Option<String>,
    image_url: Option<Option<String>>,
) -> Option<String> {
    uploaded_path.or_else(|| image_url.flatten().filter(|url| !url.trim().is_empty()))
}

/// Image change for an update: uploaded file, then an explicitly supplied URL
/// (blank clears), otherwise keep the stored reference.
pub fn resolve_for_update(
    uploaded_path: Option<String>,
    image_url: Option<Option<String>>,
) -> ImageChange {
    match (uploaded_path, image_url) {
        (Some(path), _) => ImageChange::Replace(Some(path)),
        (None, Some(url)) => {
            ImageChange::Replace(url.filter(|url| !url.trim().is_empty()))
        }
        (None, None) => ImageChange::Keep,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn upload(content_type: &str, size: usize) -> ImageUpload {
        ImageUpload {
            field_name: IMAGE_FIELD.to_string(),
            file_name: Some("photo.PNG".to_string()),
            content_type: Some(content_type.to_string()),
            data: Bytes::from(vec![7u8; size]),
        }
    }

    #[test]
    fn only_image_media_types_pass() {
        assert!(is_image_media_type(Some("image/png")));
        assert!(is_image_media_type(Some("IMAGE/jpeg")));
        assert!(!is_image_media_type(Some("application/pdf")));
        assert!(!is_image_media_type(None));
    }

    #[test]
    fn file_name_keeps_extension() {
        let name = generate_file_name("image", Some("summer hat.jpeg"));
        let parts: Vec<&str> = name.splitn(3, '-').collect();
        assert_eq!(parts[0], "image");
        assert!(parts[1].parse::<i64>().is_ok());
        assert!(parts[2].ends_with(".jpeg"));
    }

    #[test]
    fn file_name_without_extension_has_none() {
        let name = generate_file_name("image", Some("blob"));
        assert!(!name.contains('.'));
        let name = generate_file_name("image", None);
        assert!(!name.contains('.'));
    }

    #[test]
    fn create_prefers_upload_then_url() {
        assert_eq!(
            resolve_for_create(
                Some("/uploads/a.png".to_string()),
                Some(Some("https://x.test/b.png".to_string()))
            )
            .as_deref(),
            Some("/uploads/a.png")
        );
        assert_eq!(
            resolve_for_create(None, Some(Some("https://x.test/b.png".to_string()))).as_deref(),
            Some("https://x.test/b.png")
        );
        assert_eq!(resolve_for_create(None, Some(Some("   ".to_string()))), None);
        assert_eq!(resolve_for_create(None, None), None);
    }

    #[test]
    fn update_distinguishes_absent_from_empty() {
        assert_eq!(resolve_for_update(None, None), ImageChange::Keep);
        assert_eq!(
            resolve_for_update(None, Some(Some(String::new()))),
            ImageChange::Replace(None)
        );
        assert_eq!(
            resolve_for_update(None, Some(Some("/hats.jpg".to_string()))),
            ImageChange::Replace(Some("/hats.jpg".to_string()))
        );
        assert_eq!(
            resolve_for_update(Some("/uploads/x.png".to_string()), Some(None)),
            ImageChange::Replace(Some("/uploads/x.png".to_string()))
        );
    }

    #[test]
    fn only_upload_paths_map_to_stored_files() {
        assert_eq!(stored_file_name("/uploads/image-1-2.png"), Some("image-1-2.png"));
        assert_eq!(stored_file_name("/p1.jpg"), None);
        assert_eq!(stored_file_name("/uploadsx/a.png"), None);
        assert_eq!(stored_file_name("/uploads/../Cargo.toml"), None);
        assert_eq!(stored_file_name("https://cdn.test/uploads/a.png"), None);
    }

    #[tokio::test]
    async fn save_writes_file_under_upload_dir() {
        let temp = TempDir::new().unwrap();
        let config = UploadConfig {
            dir: temp.path().join("uploads"),
            max_file_size: 1024,
        };

        let path = save_upload(&config, &upload("image/png", 16)).await.unwrap();
        assert!(path.starts_with("/uploads/image-"));
        assert!(path.ends_with(".PNG"));

        let file_name = path.trim_start_matches("/uploads/");
        let written = std::fs::read(config.dir.join(file_name)).unwrap();
        assert_eq!(written.len(), 16);

        discard_upload(&config, Some(&path)).await;
        assert!(!config.dir.join(file_name).exists());
    }

    #[tokio::test]
    async fn save_rejects_oversized_and_non_images() {
        let temp = TempDir::new().unwrap();
        let config = UploadConfig {
            dir: temp.path().to_path_buf(),
            max_file_size: 8,
        };

        let err = save_upload(&config, &upload("image/png", 9)).await.unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));

        let err = save_upload(&config, &upload("text/plain", 1)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
