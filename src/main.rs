use std::sync::Arc;

use anyhow::Context;
use tonic::transport::Server;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use event_booking::api::proto::event_booking_server::EventBookingServer;
use event_booking::api::{proto, EventBookingService};
use event_booking::config::{Config, StoreBackend};
use event_booking::metrics::{self, Metrics};
use event_booking::store::{EventStore, InMemoryEventStore, PostgresEventStore};
use event_booking::utils::{retry_on_transient, RetryConfig, RetryResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering.
    // Default to INFO level, can be overridden with RUST_LOG env var.
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,event_booking=debug")),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    tracing::info!(
        grpc_addr = %config.grpc_addr,
        metrics_port = config.metrics_port,
        "🚀 Starting event booking service"
    );

    // === 1. Event store ===
    let store: Arc<dyn EventStore> = match &config.store {
        StoreBackend::Postgres { database_url } => {
            tracing::info!("Connecting to PostgreSQL...");
            let connected = retry_on_transient(RetryConfig::default(), |_attempt| {
                let url = database_url.clone();
                let max_connections = config.db_max_connections;
                async move { PostgresEventStore::connect(&url, max_connections).await }
            })
            .await;

            let store = match connected {
                RetryResult::Success(store) => store,
                RetryResult::Failed(err) | RetryResult::PermanentFailure(err) => {
                    return Err(err).context("could not connect to PostgreSQL");
                }
            };

            store
                .init_schema()
                .await
                .context("failed to initialize database schema")?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory event store; state will not survive a restart");
            Arc::new(InMemoryEventStore::new())
        }
    };

    // === 2. Prometheus metrics ===
    let metrics = Arc::new(Metrics::new()?);

    // Start metrics HTTP server in a background thread with its own
    // runtime, so the actix server and the tonic server stay independent.
    let metrics_registry = Arc::new(metrics.registry().clone());
    let metrics_port = config.metrics_port;
    std::thread::spawn(move || match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(async {
            if let Err(e) = metrics::start_metrics_server(metrics_registry, metrics_port).await {
                tracing::error!("Metrics server error: {}", e);
            }
        }),
        Err(e) => tracing::error!("Failed to build metrics runtime: {}", e),
    });

    // === 3. gRPC server with health and reflection ===
    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<EventBookingServer<EventBookingService>>()
        .await;

    let reflection_service = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(proto::FILE_DESCRIPTOR_SET)
        .build_v1()
        .context("failed to build reflection service")?;

    let service = EventBookingService::new(store, metrics, config.request_timeout);

    tracing::info!(addr = %config.grpc_addr, "📡 gRPC server listening");
    Server::builder()
        .add_service(health_service)
        .add_service(reflection_service)
        .add_service(EventBookingServer::new(service))
        .serve_with_shutdown(config.grpc_addr, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
        })
        .await
        .context("gRPC server failed")?;

    Ok(())
}
