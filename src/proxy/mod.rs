//! Backend proxy between the chat widget and the upstream completion API.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /api/chat` | forward one message upstream |
//! | `GET /api/health` | liveness and whether a key is configured |
//! | `GET /api/test` | upstream connectivity probe |
//! | everything else | static files from [`ProxyConfig::static_dir`] |

pub mod routes;
pub mod upstream;

pub use routes::{AppState, AppStateArc};
pub use upstream::{UpstreamClient, UpstreamError};

use crate::config::ProxyConfig;
use crate::Result;
use axum::http::{header, Method};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Full application router for `config`.
pub fn router(config: Arc<ProxyConfig>) -> Result<Router> {
    let upstream = UpstreamClient::new(config.clone()).map_err(|e| {
        crate::Error::configuration_with_context(
            e.to_string(),
            crate::ErrorContext::new().with_source("upstream_client"),
        )
    })?;
    let state = Arc::new(AppState::new(upstream));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Ok(Router::new()
        .merge(routes::api_routes())
        .with_state(state)
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Bind `0.0.0.0:<port>` and serve until Ctrl-C.
pub async fn serve(config: ProxyConfig) -> Result<()> {
    let port = config.port;
    let configured = config.is_configured();
    let app = router(Arc::new(config))?;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server running on http://localhost:{}", port);
    info!(
        "OpenAI API Key configured: {}",
        if configured { "yes" } else { "no" }
    );
    info!("Test the API: http://localhost:{}/api/test", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down server...");
        })
        .await?;
    Ok(())
}
