//! HTTP server exposing the idea-generation API.

pub mod routes;
pub mod state;

pub use state::ServerAppState;

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue,
    },
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Version information for the server
#[derive(serde::Serialize)]
struct VersionInfo {
    version: String,
}

/// Run the HTTP server
pub async fn run_server(
    port: u16,
    bind: &str,
    state: ServerAppState,
    cors_origins: Option<Vec<String>>,
) -> Result<(), String> {
    // Build CORS layer. Explicit headers instead of Any to avoid browser
    // deprecation warnings with wildcard headers.
    let cors = match &cors_origins {
        Some(origins) if !origins.is_empty() => {
            // Restricted CORS: only allow specified origins
            let allowed_origins: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods(Any)
                .allow_headers([CONTENT_TYPE, ACCEPT])
        }
        _ => {
            // Permissive CORS: allow any origin (default for development)
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers([CONTENT_TYPE, ACCEPT])
        }
    };

    let app = Router::new()
        .route(
            "/api/generate-ideas",
            post(routes::idea_routes::generate_ideas_handler),
        )
        .route("/api/version", get(version_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state.clone());

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let cors_display = match &cors_origins {
        Some(origins) if !origins.is_empty() => origins.join(", "),
        _ => "*".to_string(),
    };
    let mode = if state.config.has_credential() {
        "LLM (completion credential configured)"
    } else {
        "Offline fallback (no completion credential)"
    };

    println!("IdeaForge server");
    println!("  URL:          http://{}:{}", bind, port);
    println!("  Mode:         {}", mode);
    println!("  CORS origins: {}", cors_display);
    println!("  Endpoints:");
    println!("    POST /api/generate-ideas  - Generate a business idea");
    println!("    GET  /api/version         - Server version info");
    println!("    GET  /health              - Health check");

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    log::info!("Server listening on http://{}", addr);

    // Shutdown signal that waits for the shutdown state flag
    let shutdown_state = state.shutdown_state.clone();
    let shutdown_signal = async move {
        loop {
            if shutdown_state.is_shutdown_requested() {
                log::info!("Shutdown signal received, stopping server...");
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| format!("Server error: {}", e))
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Version endpoint - returns the server version
async fn version_handler() -> Json<VersionInfo> {
    Json(VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
