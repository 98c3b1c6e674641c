use crate::error::{AppError, Result};
use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
    pub public_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Allowed CORS origins. An empty list means any origin.
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_file_size: usize,
}

pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 5 * 1024 * 1024;

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_file_size: DEFAULT_MAX_UPLOAD_SIZE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid PORT value".to_string()))?,
                max_body_size: env::var("MAX_BODY_SIZE")
                    .unwrap_or_else(|_| "10485760".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid MAX_BODY_SIZE value".to_string()))?,
                public_dir: env::var("PUBLIC_DIR")
                    .unwrap_or_else(|_| "public".to_string())
                    .into(),
            },
            database: DatabaseConfig {
                url: env::var("DB_URL")?,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::ConfigError("Invalid DB_MAX_CONNECTIONS value".to_string())
                    })?,
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&env::var("FRONTEND_URL").unwrap_or_default()),
            },
            uploads: UploadConfig {
                dir: env::var("UPLOAD_DIR")
                    .unwrap_or_else(|_| "uploads".to_string())
                    .into(),
                max_file_size: env::var("MAX_UPLOAD_SIZE")
                    .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_SIZE.to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::ConfigError("Invalid MAX_UPLOAD_SIZE value".to_string())
                    })?,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Comma-separated origins. A `*` anywhere yields the empty (any-origin) list.
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<&str> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if origins.contains(&"*") {
        return Vec::new();
    }

    origins.into_iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_split() {
        let origins = parse_origins("http://a.test, http://b.test ,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn wildcard_or_empty_means_any_origin() {
        assert!(parse_origins("").is_empty());
        assert!(parse_origins("*").is_empty());
    }

    #[test]
    fn wildcard_mixed_with_origins_means_any_origin() {
        assert!(parse_origins("http://a.test,*").is_empty());
        assert!(parse_origins(" * , http://b.test").is_empty());
    }

    #[test]
    fn upload_defaults_allow_five_mebibytes() {
        let uploads = UploadConfig::default();
        assert_eq!(uploads.max_file_size, 5 * 1024 * 1024);
        assert_eq!(uploads.dir, PathBuf::from("uploads"));
    }
}
