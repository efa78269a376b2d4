//! Morshed API Gateway
//!
//! The entry point for all external API requests.
//! Handles:
//! - Professor search and submissions
//! - Review and reply submissions with moderation
//! - Rankings (professors, colleges, courses)
//! - Observability (logging, metrics, tracing)

mod handlers;
mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use morshed_common::{cache::Cache, config::AppConfig, db::DbPool, metrics};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    /// Best-effort rankings cache; `None` when Redis is unreachable
    pub cache: Option<Arc<Cache>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.observability.log_level.clone()));
    if config.observability.json_logging {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    info!("Starting Morshed API Gateway v{}", morshed_common::VERSION);

    let config = Arc::new(config);

    // Initialize metrics
    if config.observability.metrics_port > 0 {
        let exporter = metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(([0, 0, 0, 0], config.observability.metrics_port));
        exporter.install()?;
        info!(port = config.observability.metrics_port, "Prometheus exporter started");
    }
    metrics::register_metrics();

    // Initialize database connection
    info!("Connecting to database...");
    let db = DbPool::new(&config.database).await?;

    // Initialize the rankings cache; the service runs without it
    let cache = match Cache::new(&config.redis).await {
        Ok(cache) => Some(Arc::new(cache)),
        Err(e) => {
            warn!(error = %e, "Redis unavailable, rankings will be recomputed per request");
            None
        }
    };

    // Create app state
    let state = AppState {
        config: config.clone(),
        db,
        cache,
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // API routes
    let api_routes = Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))

        // University endpoints
        .route("/universities", get(handlers::universities::list_universities))
        .route("/universities/{slug}", get(handlers::universities::get_university))

        // Professor endpoints
        .route("/professors/search", get(handlers::professors::search_professors))
        .route("/professors", post(handlers::professors::submit_professor))
        .route("/professors/{id}", get(handlers::professors::get_professor))
        .route("/professors/{id}/views", post(handlers::professors::increment_views))

        // Review endpoints
        .route("/professors/{id}/reviews", get(handlers::reviews::list_reviews))
        .route("/professors/{id}/reviews", post(handlers::reviews::submit_review))
        .route("/reviews/{id}/likes", post(handlers::reviews::like_review))

        // Reply endpoints
        .route("/reviews/{id}/replies", post(handlers::replies::submit_reply))
        .route("/replies/{id}/likes", post(handlers::replies::like_reply))

        // Rankings endpoints
        .route("/rankings/professors", get(handlers::rankings::professor_rankings))
        .route("/rankings/colleges", get(handlers::rankings::college_rankings))
        .route("/rankings/courses", get(handlers::rankings::course_rankings));

    // Rate limiting
    let api_routes = if state.config.rate_limit.enabled {
        let limiter = middleware::rate_limit::create_rate_limiter(
            state.config.rate_limit.requests_per_second,
            state.config.rate_limit.burst,
        );
        api_routes.layer(axum::middleware::from_fn(move |request, next| {
            let limiter = limiter.clone();
            middleware::rate_limit::rate_limit_middleware(request, next, limiter)
        }))
    } else {
        api_routes
    };

    // Compose the app
    Router::new()
        .nest("/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
