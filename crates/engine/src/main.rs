//! Holdfast Engine - Main entry point.
//!
//! Runs the territory store standalone: loads the persisted claims, keeps
//! the decay worker ticking and writes a final snapshot on shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use holdfast_engine::infrastructure::{
    config::TerritoryConfig,
    decay_worker::run_decay_worker,
    in_memory::{InMemoryClanDirectory, InMemoryWorldDirectory},
    persistence::JsonFileTerritoryRepo,
};
use holdfast_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "holdfast_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Holdfast Engine");

    let config = TerritoryConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        core = config.thresholds.core(),
        secure = config.thresholds.secure(),
        contested = config.thresholds.contested(),
        "Configuration loaded"
    );

    let repo = Arc::new(JsonFileTerritoryRepo::new(config.data_path.clone()));
    tracing::info!(path = %repo.path().display(), "Using territory file");
    let worlds = InMemoryWorldDirectory::new(config.worlds.iter().cloned());
    let clans = Arc::new(InMemoryClanDirectory::new());

    let app = App::load(repo, clans, &worlds, &config).await;

    for clan in app.store.clan_names().await {
        let summary = app.store.clan_summary(&clan, app.access.thresholds()).await;
        tracing::info!(
            clan = %clan,
            cells = summary.total,
            core = summary.core,
            secure = summary.secure,
            contested = summary.contested,
            frontier = summary.frontier,
            flags = summary.flags,
            "Clan territory"
        );
    }

    let cancel_token = CancellationToken::new();
    setup_shutdown_signal(cancel_token.clone());

    let decay_worker = if config.decay.is_enabled() {
        let store = app.store.clone();
        let cancel = cancel_token.clone();
        Some(tokio::spawn(run_decay_worker(
            store,
            config.decay.interval(),
            config.decay.points,
            cancel,
        )))
    } else {
        tracing::info!("Influence decay disabled");
        None
    };

    cancel_token.cancelled().await;

    if let Some(worker) = decay_worker {
        if let Err(e) = worker.await {
            tracing::error!(error = %e, "Decay worker ended abnormally");
        }
    }

    app.store
        .flush()
        .await
        .context("Failed to write territories on shutdown")?;
    tracing::info!("Territories saved, shutdown complete");
    Ok(())
}

/// Cancel `cancel_token` on Ctrl+C or SIGTERM.
fn setup_shutdown_signal(cancel_token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown...");
            }
        }

        cancel_token.cancel();
    });
}
