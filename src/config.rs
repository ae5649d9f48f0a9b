//! Application-level configuration loaded from the environment.

use std::env;

use tracing::{info, warn};

/// Default port the HTTP server binds to.
const DEFAULT_PORT: u16 = 8080;
/// Environment variables consulted for the listen port, in order.
const PORT_ENVS: [&str; 2] = ["PORT", "SERVER_PORT"];
/// Environment variable selecting the storage backend.
const STORAGE_ENV: &str = "TEA_ROUND_STORAGE";
/// Environment variable carrying the MongoDB connection URI.
const MONGO_URI_ENV: &str = "MONGO_URI";
/// Environment variable carrying the MongoDB database name.
const MONGO_DB_ENV: &str = "MONGO_DB";
/// Default MongoDB connection URI when none is configured.
const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Storage backend the entity store is built on.
    pub storage: StorageBackend,
}

/// Storage backend selection resolved at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local store; data does not survive a restart.
    Memory,
    /// Durable MongoDB-backed store.
    Mongo {
        /// Connection URI handed to the driver.
        uri: String,
        /// Database name, or the driver default when unset.
        database: Option<String>,
    },
}

impl AppConfig {
    /// Load the configuration from the environment, falling back to defaults
    /// with a log line per decision.
    pub fn load() -> Self {
        let port = PORT_ENVS
            .iter()
            .find_map(|var| env::var(var).ok())
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let storage = match env::var(STORAGE_ENV).as_deref() {
            Ok("mongodb") => {
                let uri = env::var(MONGO_URI_ENV).unwrap_or_else(|_| {
                    info!(
                        uri = DEFAULT_MONGO_URI,
                        "{MONGO_URI_ENV} not set; using default"
                    );
                    DEFAULT_MONGO_URI.into()
                });
                StorageBackend::Mongo {
                    uri,
                    database: env::var(MONGO_DB_ENV).ok(),
                }
            }
            Ok("memory") | Err(_) => StorageBackend::Memory,
            Ok(other) => {
                warn!(
                    backend = other,
                    "unknown {STORAGE_ENV} value; falling back to the in-memory store"
                );
                StorageBackend::Memory
            }
        };

        info!(port, storage = storage_name(&storage), "loaded configuration");
        Self { port, storage }
    }
}

fn storage_name(storage: &StorageBackend) -> &'static str {
    match storage {
        StorageBackend::Memory => "memory",
        StorageBackend::Mongo { .. } => "mongodb",
    }
}
