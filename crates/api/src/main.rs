//! API server entry point.

use std::sync::Arc;

use api::config::{Config, LogFormat};
use events::{BroadcastPublisher, FileEventLog, PublishDispatcher, RedisPublisher};
use storage::{InMemoryUserRepository, PostgresUserRepository};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    init_tracing(&config);

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Event log and publisher
    let event_log = FileEventLog::open(&config.events_log_file_path)
        .await
        .expect("failed to open event log");

    let dispatcher = match &config.redis_url {
        Some(url) => {
            let publisher = RedisPublisher::connect(url, config.redis_events_channel.clone())
                .await
                .expect("failed to connect to Redis");
            tracing::info!(channel = %config.redis_events_channel, "publishing events to Redis");
            PublishDispatcher::spawn(publisher, config.dispatch)
        }
        None => {
            tracing::warn!("REDIS_URL not set, events are only published in-process");
            PublishDispatcher::spawn(BroadcastPublisher::default(), config.dispatch)
        }
    };
    let dispatcher = Arc::new(dispatcher);

    // 4. Repository and application state
    let state = match &config.database_url {
        Some(url) => {
            let repository = PostgresUserRepository::connect(url, DATABASE_MAX_CONNECTIONS)
                .await
                .expect("failed to connect to PostgreSQL");
            repository
                .run_migrations()
                .await
                .expect("failed to run migrations");
            tracing::info!("using PostgreSQL user repository");
            api::create_state(repository, event_log, dispatcher.clone(), config.pagination)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, users are kept in memory");
            api::create_state(
                InMemoryUserRepository::new(),
                event_log,
                dispatcher.clone(),
                config.pagination,
            )
        }
    };

    // 5. Build the application
    let app = api::create_app(state, metrics_handle);

    // 6. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    // 7. Flush events still waiting to be published
    dispatcher.shutdown().await;

    tracing::info!("server shut down gracefully");
}
