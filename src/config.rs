//! Service configuration.
//!
//! Loaded from environment variables with defaults that make a bare
//! `cargo run` work: without `DATABASE_URL` the service falls back to the
//! in-memory store.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context};

/// Which event store backs the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL via sqlx.
    Postgres { database_url: String },
    /// In-process map; state is lost on shutdown. Tests and local
    /// development only.
    Memory,
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// gRPC bind address (`GRPC_ADDR`, default `127.0.0.1:50051`).
    pub grpc_addr: SocketAddr,
    /// Prometheus scrape port (`METRICS_PORT`, default `9090`).
    pub metrics_port: u16,
    /// Store backend. `STORE` forces `postgres` or `memory`; unset, the
    /// presence of `DATABASE_URL` decides.
    pub store: StoreBackend,
    /// Connection pool size (`DB_MAX_CONNECTIONS`, default `10`).
    pub db_max_connections: u32,
    /// Per-request deadline (`REQUEST_TIMEOUT_MS`, default `5000`).
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let grpc_addr = env_or("GRPC_ADDR", "127.0.0.1:50051")
            .parse()
            .context("GRPC_ADDR must be a host:port address")?;
        let metrics_port = env_or("METRICS_PORT", "9090")
            .parse()
            .context("METRICS_PORT must be a port number")?;
        let db_max_connections = env_or("DB_MAX_CONNECTIONS", "10")
            .parse()
            .context("DB_MAX_CONNECTIONS must be a number")?;
        let request_timeout_ms: u64 = env_or("REQUEST_TIMEOUT_MS", "5000")
            .parse()
            .context("REQUEST_TIMEOUT_MS must be milliseconds")?;

        let database_url = env::var("DATABASE_URL").ok();
        let store = match env::var("STORE").ok().as_deref() {
            Some("postgres") => match database_url {
                Some(database_url) => StoreBackend::Postgres { database_url },
                None => bail!("STORE=postgres requires DATABASE_URL to be set"),
            },
            Some("memory") => StoreBackend::Memory,
            Some(other) => bail!("unsupported STORE '{other}' (expected 'postgres' or 'memory')"),
            None => match database_url {
                Some(database_url) => StoreBackend::Postgres { database_url },
                None => StoreBackend::Memory,
            },
        };

        Ok(Self {
            grpc_addr,
            metrics_port,
            store,
            db_max_connections,
            request_timeout: Duration::from_millis(request_timeout_ms),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
