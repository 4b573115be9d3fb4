//! HTTP API server with observability for the users service.
//!
//! Queries are served by a [`UserQueryService`]; commands go through the
//! decorated command pipeline (event log and publish, logging, base service).
//! Logging uses `tracing`, metrics are exported for Prometheus.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get};
use domain::{PaginationConfig, UserRepository};
use events::{EventLogger, PublishDispatcher};
use metrics_exporter_prometheus::PrometheusHandle;
use service::{CommandPipeline, UserQueryService};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::users::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/users",
            get(routes::users::list).post(routes::users::create),
        )
        .route(
            "/users/{id}",
            delete(routes::users::delete).patch(routes::users::modify),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state over `repository`.
///
/// Commands run through the full pipeline: every command is written to
/// `event_log` and handed to `dispatcher` before it reaches the repository.
pub fn create_state<R>(
    repository: R,
    event_log: impl EventLogger + 'static,
    dispatcher: Arc<PublishDispatcher>,
    pagination: PaginationConfig,
) -> Arc<AppState>
where
    R: UserRepository + 'static,
{
    let repository = Arc::new(repository);

    let commands = CommandPipeline::builder(repository.clone())
        .with_logging()
        .with_events(event_log, dispatcher)
        .build();

    Arc::new(AppState {
        commands,
        queries: Arc::new(UserQueryService::new(repository)),
        pagination,
    })
}
