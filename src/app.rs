use std::{future::Future, sync::Arc};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
};

use crate::{
    config::{AppConfig, CorsConfig, UploadConfig},
    database,
    error::{AppError, Result},
    routes,
    services::image_service::UPLOADS_ROUTE,
    store::{PgStore, Store},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub uploads: Arc<UploadConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, uploads: UploadConfig) -> Self {
        Self {
            store,
            uploads: Arc::new(uploads),
        }
    }
}

/// Connects, migrates and seeds the database, then assembles the router.
pub async fn build(config: &AppConfig) -> Result<(Router, AppState)> {
    let pool = database::create_pool(&config.database).await?;
    database::run_migrations(&pool).await?;

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
    database::seed_if_empty(store.as_ref()).await?;

    tokio::fs::create_dir_all(&config.uploads.dir).await?;

    let state = AppState::new(store, config.uploads.clone());
    let app = router(state.clone(), config)?;

    Ok((app, state))
}

/// Serves `app` until `shutdown` resolves and in-flight requests finish, then
/// closes the store whether or not serving failed.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    store: Arc<dyn Store>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on {}", addr);
    }

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    store.close().await;
    served?;

    tracing::info!("Server stopped gracefully");
    Ok(())
}

pub fn router(state: AppState, config: &AppConfig) -> Result<Router> {
    let cors = cors_layer(&config.cors)?;
    let uploads = ServeDir::new(&state.uploads.dir);
    let public = ServeDir::new(&config.server.public_dir);

    let app = routes::create_router()
        .nest_service(UPLOADS_ROUTE, uploads)
        .fallback_service(public)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors)
        .with_state(state);

    Ok(app)
}

fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let allow_origin = if config.allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins = config
            .allowed_origins
            .iter()
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|_| {
                    AppError::ConfigError(format!("Invalid CORS origin: {}", origin))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_origin(allow_origin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_origin_is_a_config_error() {
        let config = CorsConfig {
            allowed_origins: vec!["http://ok.test".to_string(), "bad\norigin".to_string()],
        };
        assert!(matches!(cors_layer(&config), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn empty_origin_list_allows_any() {
        assert!(cors_layer(&CorsConfig::default()).is_ok());
    }
}
