use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::convert::Infallible;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::{
    infrastructure::{
        config::{HandlerLimits, HandlersConfig},
        http::{health_check, readiness_check},
        storage::signed_urls::SIGNED_DOWNLOAD_PREFIX,
    },
    presentation::handlers::{self, AppState},
};

/// Create all application routes with application state
pub fn create_routes(app_state: AppState, handlers_config: &HandlersConfig) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .nest("/events", event_routes(handlers_config))
        .route(
            &format!("{SIGNED_DOWNLOAD_PREFIX}/{{*path}}"),
            get(handlers::objects::download_object),
        )
        .with_state(app_state)
}

/// Event triggers, each bounded by its own timeout and concurrency cap
fn event_routes(handlers_config: &HandlersConfig) -> Router<AppState> {
    Router::new()
        .route(
            "/image",
            post(handlers::events::moderate_image)
                .layer::<_, Infallible>(timeout(&handlers_config.image))
                .layer(concurrency_limit(&handlers_config.image)),
        )
        .route(
            "/video",
            post(handlers::events::moderate_video)
                .layer::<_, Infallible>(timeout(&handlers_config.video))
                .layer(concurrency_limit(&handlers_config.video)),
        )
}

/// Timed-out invocations answer 504 so the event is redelivered
fn timeout(limits: &HandlerLimits) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::GATEWAY_TIMEOUT, limits.timeout())
}

fn concurrency_limit(limits: &HandlerLimits) -> ConcurrencyLimitLayer {
    ConcurrencyLimitLayer::new(limits.max_instances as usize)
}
