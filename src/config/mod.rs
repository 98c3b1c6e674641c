mod app_config;

pub use app_config::{
    AppConfig, CorsConfig, DEFAULT_MAX_UPLOAD_SIZE, DatabaseConfig, ServerConfig, UploadConfig,
};
