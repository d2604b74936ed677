//! `aleo-exporterd`: serves Aleo node state as Prometheus metrics.
//!
//! ```text
//! ALEO_RPC_ENDPOINT=https://node:3030 aleo-exporterd --web.listen-address :9200
//! ```

mod config;

use std::path::Path;
use std::sync::Arc;

use aleo_api::MetricsApi;
use aleo_fetch::Fetcher;
use aleo_observe::logger_init;
use aleo_prometheus::{ExporterMetrics, MetricSchema, NodeCollector};
use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{Args, ExporterConfig, env_file_from};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Env file before flags: clap reads ALEO_RPC_* while parsing.
    let env_file = env_file_from(std::env::args_os());
    let loaded = dotenvy::from_path(&env_file);

    let cfg = ExporterConfig::try_from(Args::parse())?;
    logger_init(&cfg.logger)?;
    report_env_file(&env_file, loaded);

    let fetcher = Fetcher::new(cfg.fetch.clone()).context("building node client")?;
    let metrics = ExporterMetrics::new().context("registering exporter metrics")?;
    let collector = Arc::new(NodeCollector::new(
        fetcher,
        Arc::new(MetricSchema::aleo()),
        metrics,
    ));

    let shutdown = CancellationToken::new();
    let app = MetricsApi::new(collector)
        .metrics_path(cfg.metrics_path.clone())
        .include_exporter_metrics(cfg.include_exporter_metrics)
        .shutdown(shutdown.clone())
        .router();

    let listener = tokio::net::TcpListener::bind(cfg.listen)
        .await
        .with_context(|| format!("binding {}", cfg.listen))?;
    info!(
        listen = %cfg.listen,
        metrics_path = %cfg.metrics_path,
        endpoint = %cfg.fetch.endpoint,
        format = %cfg.fetch.format,
        "aleo exporter listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("aleo exporter stopped");
    Ok(())
}

fn report_env_file(path: &Path, loaded: Result<(), dotenvy::Error>) {
    match loaded {
        Ok(()) => info!(path = %path.display(), "environment file loaded"),
        Err(err) if err.not_found() => {
            info!(path = %path.display(), "environment file not found, skipping")
        }
        Err(err) => warn!(path = %path.display(), error = %err, "environment file ignored"),
    }
}

/// Resolves on Ctrl+C or SIGTERM and cancels in-flight scrapes.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
    token.cancel();
}
