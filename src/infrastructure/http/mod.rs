use axum::{Router, extract::State, http::StatusCode, response::Json};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::infrastructure::config::{AppConfig, HandlerLimits};
use crate::presentation::{handlers::AppState, routes};

/// Create the main application router
pub fn create_app(config: &AppConfig, app_state: AppState) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id());

    routes::create_routes(app_state, &config.handlers)
        .fallback(not_found_handler)
        .layer(middleware_stack)
}

/// Liveness probe
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "upload-moderation-service"
    }))
}

/// Readiness probe: the bucket is reachable and both placeholders exist
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let image = placeholder_status(&state, &state.placeholders.image).await;
    let video = placeholder_status(&state, &state.placeholders.video).await;
    let ready = image == "ok" && video == "ok";

    let status = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (
        status,
        Json(json!({
            "status": if ready { "ready" } else { "not_ready" },
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "checks": {
                "bucket": state.storage.bucket(),
                "image_placeholder": image,
                "video_placeholder": video
            }
        })),
    )
}

async fn placeholder_status(state: &AppState, path: &str) -> &'static str {
    match state.storage.exists(path).await {
        Ok(true) => "ok",
        Ok(false) => "missing",
        Err(e) => {
            warn!(path, "Readiness check could not reach storage: {}", e);
            "unreachable"
        }
    }
}

/// Handler for 404 not found
async fn not_found_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": "The requested resource was not found"
        })),
    )
}

fn log_handler_limits(name: &str, limits: &HandlerLimits) {
    info!(
        handler = name,
        timeout_seconds = limits.timeout_seconds,
        memory_mb = limits.memory_mb,
        min_instances = limits.min_instances,
        max_instances = limits.max_instances,
        "Handler limits"
    );
}

/// Start the HTTP server and run until SIGINT or SIGTERM
///
/// # Errors
/// Returns an error if wiring the collaborators or binding the listener fails
pub async fn start_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app_state = AppState::from_config(&config)?;
    log_handler_limits("image", &config.handlers.image);
    log_handler_limits("video", &config.handlers.video);

    let app = create_app(&config, app_state);
    let addr = config.server.socket_addr();

    info!(
        bucket = %config.storage.bucket,
        base_path = %config.storage.base_path,
        replace_strategy = ?config.storage.replace_strategy,
        "Starting server on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining in-flight events");
}
