use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use sweep_common::{LogConfig, init_logging};
use sweep_config::{SweepConfig, SweepConfigLoader};
use sweep_runtime::SweepRuntime;
use sweep_server::AppState;
use tokio::net::TcpListener;

const APP_NAME: &str = "tweet-sweep";
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Serve recent tweets addressed to the watched accounts.
#[derive(Debug, Parser)]
#[command(name = "tweet-sweep", version)]
struct Cli {
    /// YAML config file; may be absent when everything comes from `SWEEP__*` env vars.
    #[arg(long, env = "SWEEP_CONFIG", default_value = "sweep.yaml")]
    config: PathBuf,

    /// Listen address, overriding `server.bind`.
    #[arg(long)]
    bind: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let cfg: SweepConfig = SweepConfigLoader::new()
        .with_optional_file(&cli.config)
        .load()
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // 2) Logging
    let log_path = init_logging(LogConfig {
        app_name: APP_NAME,
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.emit_stderr,
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone(),
    })?;
    tracing::info!(log_file = %log_path.display(), version = ?cfg.version, "app.start");

    // 3) Runtime + server
    let runtime = SweepRuntime::build(APP_NAME, cfg.server.worker_threads)?;
    let handle = runtime.handle();
    let bind = cli.bind.unwrap_or_else(|| cfg.server.bind.clone());

    let served = runtime.block_on(async {
        let state = AppState::from_config(&cfg.twitter, handle.cancellation())?;
        let listener = TcpListener::bind(&bind)
            .await
            .with_context(|| format!("binding {bind}"))?;

        let signal = handle.clone();
        handle.spawn(async move { signal.cancel_on_ctrl_c().await });

        sweep_server::serve(listener, state, handle.cancellation().cancelled_owned()).await?;
        Ok::<(), anyhow::Error>(())
    });

    runtime.shutdown(SHUTDOWN_GRACE);
    tracing::info!("app.stop");
    served
}
