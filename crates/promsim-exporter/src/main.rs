//! promsim exporter
//!
//! - `/metrics` in Prometheus text format (default port 8000)
//! - Background task simulating requests with random latency
//! - Optional `promsim.yaml` in the working directory overrides the defaults

use std::process::ExitCode;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use promsim_core::error::{PromsimError, Result};
use promsim_exporter::{app_state::AppState, config, router, workload::Workload};

const CONFIG_PATH: &str = "promsim.yaml";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "promsim-exporter failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cfg = config::load_or_default(CONFIG_PATH)?;
    let listen = cfg.exporter.listen_addr()?;

    let state = AppState::new(cfg)?;
    let workload = Workload::new(state.metrics(), state.cfg().workload.clone())?;

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| PromsimError::Io(format!("bind {listen} failed: {e}")))?;

    tracing::info!(%listen, "promsim-exporter starting");
    println!("Metrics server running at http://localhost:{}/metrics", listen.port());

    let (stop_tx, stop_rx) = watch::channel(false);
    let worker = tokio::spawn(workload.run(StdRng::from_entropy(), stop_rx));

    let app = router::build_router(state.clone());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state, stop_tx))
        .await
        .map_err(|e| PromsimError::Io(format!("server failed: {e}")))?;

    worker
        .await
        .map_err(|e| PromsimError::Internal(format!("workload task failed: {e}")))?;
    Ok(())
}

async fn shutdown_signal(state: AppState, stop: watch::Sender<bool>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("signal received, starting graceful shutdown");
    state.set_draining();
    let _ = stop.send(true);
}
