mod handlers;

use std::future::Future;
use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Router};

use crate::contracts::CounterStore;

pub use handlers::{AppState, ErrorResponse};

/// Creates the API router.
pub fn create_router<C: CounterStore + 'static>(state: Arc<AppState<C>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/likes", get(handlers::get_likes::<C>).options(preflight))
        .route("/like", post(handlers::post_like::<C>).options(preflight))
        .layer(middleware::map_response(allow_any_origin))
        .with_state(state)
}

/// The plugin runs inside the host's page and calls the proxy cross-origin.
async fn allow_any_origin(mut response: Response) -> Response {
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3001,
        }
    }
}

impl ServerConfig {
    /// Creates a config from `BLANKTABLE_HOST` and `BLANKTABLE_PORT`.
    /// Empty or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let default = Self::default();
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            host: var("BLANKTABLE_HOST").unwrap_or(default.host),
            port: var("BLANKTABLE_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(default.port),
        }
    }
}

/// Starts the HTTP server.
pub async fn start_server<C, F>(
    config: ServerConfig,
    state: Arc<AppState<C>>,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    C: CounterStore + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let router = create_router(state);
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_ignores_empty_values() {
        std::env::set_var("BLANKTABLE_HOST", "");
        std::env::set_var("BLANKTABLE_PORT", " ");
        let config = ServerConfig::from_env();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3001);

        std::env::set_var("BLANKTABLE_HOST", "127.0.0.1");
        std::env::set_var("BLANKTABLE_PORT", "8080");
        let config = ServerConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);

        std::env::remove_var("BLANKTABLE_HOST");
        std::env::remove_var("BLANKTABLE_PORT");
    }
}
