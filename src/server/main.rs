use std::sync::Arc;

use anyhow::{Context, Result};
use jobqueue_core::persistence::{PersistenceMonitor, SnapshotStore};
use jobqueue_core::queue::Controller;
use jobqueue_core::server::build_app;
use jobqueue_core::Config;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,jobqueue_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("starting job queue engine");

    let config = Config::from_env().context("failed to load configuration")?;
    tracing::info!(db_path = %config.db_path, api_port = config.api_port, "configuration loaded");

    let snapshot =
        Arc::new(SnapshotStore::new(config.db_path.clone(), &config.secret).context("failed to initialize snapshot store")?);

    let store = snapshot.load().context("failed to load snapshot")?;
    tracing::info!(queues = store.queues.len(), "snapshot loaded");

    let (dirty_tx, dirty_rx) = mpsc::channel(1);
    let controller = Arc::new(Controller::from_store(store, dirty_tx));

    let _monitor = PersistenceMonitor::spawn(controller.clone(), snapshot, dirty_rx);

    let app = build_app(controller);

    let addr = format!("0.0.0.0:{}", config.api_port);
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("server error")?;

    Ok(())
}
