//! # Configuration
//!
//! Command-line flags with environment fallbacks.

use clap::{Parser, ValueEnum};

use crate::storage::sqlite::connection::DEFAULT_DATABASE_URL;

/// Which [`crate::storage::ZooStore`] backs the services
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    /// Process memory, lost on exit
    Memory,
    Sqlite,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "zoo-records")]
#[command(about = "Zoo record management service", long_about = None)]
pub struct Config {
    #[arg(long, env = "ZOO_BACKEND", value_enum, default_value_t = StoreBackend::Memory)]
    pub backend: StoreBackend,

    #[arg(long, env = "ZOO_DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Address the HTTP server listens on
    #[arg(long, env = "ZOO_BIND", default_value = "127.0.0.1:3000")]
    pub bind: String,

    /// Load the demo fixture into the in-memory store
    #[arg(long, env = "ZOO_SEED_DEMO")]
    pub seed_demo_data: bool,

    #[arg(long, env = "ZOO_CORS_ORIGIN", default_value = "http://localhost:8080")]
    pub cors_origin: String,

    /// Tracing filter, e.g. `debug` or `zoo_records=trace`. RUST_LOG wins when set.
    #[arg(long, env = "ZOO_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// In-memory store with defaults, for tests
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind: "127.0.0.1:3000".to_string(),
            seed_demo_data: false,
            cors_origin: "http://localhost:8080".to_string(),
            log_level: "info".to_string(),
        }
    }
}
