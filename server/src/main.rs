//! ProcWarden Dashboard Server
//!
//! HTTP control surface over the triage engine.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    PROCWARDEN SERVER                       │
//! ├────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌─────────────────────────────────────┐  │
//! │  │  API      │   │  Scan Engine                        │  │
//! │  │  (Axum)   │──▶│  collector → publisher → classifier │  │
//! │  │           │   │  → anomaly → assemble → sort        │  │
//! │  └───────────┘   └──────────────────┬──────────────────┘  │
//! │                                     ▼                      │
//! │                           ┌──────────────────┐            │
//! │                           │ scan_results.json│            │
//! │                           └──────────────────┘            │
//! └────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use procwarden_engine::collector::SystemCollector;
use procwarden_engine::publisher::SystemPublisherResolver;
use procwarden_engine::response::ProcessTerminator;
use procwarden_engine::scanner::ScanEngine;
use procwarden_engine::store::{JsonFileStore, ScoreHistory};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() {
    // Initialize logging; the engine's `log` records flow through the
    // tracing-log bridge
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "procwarden=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("ProcWarden server starting...");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Results file: {}", config.results_path.display());

    let state = build_state(&config);
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app).await.expect("Server error");
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ScanEngine>,
    pub results: JsonFileStore,
    pub history: Arc<parking_lot::Mutex<ScoreHistory>>,
    pub terminator: Arc<ProcessTerminator>,
}

fn build_state(config: &config::Config) -> AppState {
    let results = JsonFileStore::new(config.results_path.clone());

    let engine = Arc::new(ScanEngine::new(
        Box::new(SystemCollector::with_interval(Duration::from_millis(
            config.cpu_sample_ms,
        ))),
        Box::new(SystemPublisherResolver::new()),
        Some(Box::new(results.clone())),
    ));

    AppState {
        engine,
        results,
        history: Arc::new(parking_lot::Mutex::new(ScoreHistory::new())),
        terminator: Arc::new(ProcessTerminator::new()),
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/scan", get(handlers::scan::run))
        .route("/api/v1/results", get(handlers::scan::last_results))
        .route("/api/v1/history", get(handlers::scan::history))
        .route("/api/v1/connections", get(handlers::connections::list))
        .route("/api/v1/processes/kill", post(handlers::processes::kill))
        .route(
            "/api/v1/reports/assessment",
            get(handlers::reports::assessment),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let results = JsonFileStore::new(
            std::env::temp_dir().join(format!("procwarden_test_{}.json", std::process::id())),
        );

        let engine = Arc::new(ScanEngine::new(
            Box::new(SystemCollector::new()),
            Box::new(SystemPublisherResolver::new()),
            None,
        ));

        AppState {
            engine,
            results,
            history: Arc::new(parking_lot::Mutex::new(ScoreHistory::new())),
            terminator: Arc::new(ProcessTerminator::new()),
        }
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_history_starts_empty() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/history")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_results_empty_before_first_scan() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/results")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
