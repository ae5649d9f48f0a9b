//! Tea Round Back binary entrypoint wiring the REST and storage layers.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dao;
mod dto;
mod error;
mod routes;
mod services;
mod state;

use config::{AppConfig, StorageBackend};
use dao::team_store::memory::MemoryTeamStore;
use state::SharedState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = state::AppState::new();

    match config.storage {
        StorageBackend::Memory => {
            app_state
                .install_team_store(Arc::new(MemoryTeamStore::new()))
                .await;
            info!("installed in-memory team store");
        }
        StorageBackend::Mongo { uri, database } => {
            spawn_mongo_supervisor(app_state.clone(), uri, database)?;
        }
    }

    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Spawn the background supervisor that keeps the MongoDB store connected.
#[cfg(feature = "mongo-store")]
fn spawn_mongo_supervisor(
    state: SharedState,
    uri: String,
    database: Option<String>,
) -> anyhow::Result<()> {
    use crate::dao::storage::StorageError;
    use crate::dao::team_store::TeamStore;
    use crate::dao::team_store::mongodb::{MongoConfig, MongoTeamStore};

    tokio::spawn(services::storage_supervisor::run(state, move || {
        let uri = uri.clone();
        let database = database.clone();
        async move {
            let config = MongoConfig::from_uri(&uri, database.as_deref())
                .await
                .map_err(StorageError::from)?;
            let store = MongoTeamStore::connect(config)
                .await
                .map_err(StorageError::from)?;
            Ok(Arc::new(store) as Arc<dyn TeamStore>)
        }
    }));

    Ok(())
}

#[cfg(not(feature = "mongo-store"))]
fn spawn_mongo_supervisor(
    _state: SharedState,
    _uri: String,
    _database: Option<String>,
) -> anyhow::Result<()> {
    anyhow::bail!("storage backend `mongodb` requires the `mongo-store` feature")
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
