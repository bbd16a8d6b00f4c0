//! Server startup and tracing initialization.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use simjobs_api::{
    AppState, InterfaceConfig, InterfaceServer, JobStore, MemoryJobStore, SimulationExecutor,
    SyntheticSimulator,
};
use simjobs_config::{Config, ConfigError, ConfigLoader, ConfigValidator, LoggingConfig};
use simjobs_workqueue::{QueueConfig, TaskQueue, WorkerPool};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize tracing with console output and, if enabled, a daily log file.
///
/// `RUST_LOG` takes precedence over `logging.level`.
pub(crate) fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let file_layer = if logging.file_enabled {
        let log_dir = logging.log_dir();
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("simjobs")
            .filename_suffix("log")
            .max_log_files(30)
            .build(&log_dir)?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let _ = LOG_GUARD.set(guard);

        Some(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Load the configuration file and apply command-line overrides.
///
/// A missing file falls back to defaults.
pub(crate) fn load_config(
    path: &Path,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(Config, bool), ConfigError> {
    let (mut config, from_file) = ConfigLoader::load_or_default(path)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    Ok((config, from_file))
}

/// Reject configurations with errors and log the warnings.
pub(crate) fn check_config(config: &Config) -> Result<(), ConfigError> {
    let result = ConfigValidator::validate(config);
    for warning in &result.warnings {
        warn!("Config warning at {}: {}", warning.path, warning.message);
    }
    match result.errors.first() {
        None => Ok(()),
        Some(first) => Err(ConfigError::InvalidValue {
            field: first.path.clone(),
            message: first.message.clone(),
        }),
    }
}

/// Run the server in foreground until Ctrl+C.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting simjobs v{}", env!("CARGO_PKG_VERSION"));
    check_config(&config)?;

    let queue_config = QueueConfig {
        max_workers: config.executor.max_workers,
        max_queue_size: config.executor.max_queue_size,
    };

    let job_store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
    let queue = Arc::new(TaskQueue::new(queue_config.clone()));
    let pool = Arc::new(WorkerPool::new(queue_config));
    let executor = Arc::new(
        SimulationExecutor::new(job_store.clone(), Arc::new(SyntheticSimulator))
            .with_mark_failed(config.executor.mark_failed),
    );

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let dispatch = tokio::spawn(pool.clone().run_loop(queue.clone(), executor, shutdown_rx));

    let state = Arc::new(AppState::new(job_store, queue, pool));
    let server = InterfaceServer::new(InterfaceConfig::from(&config), state);
    info!("Simulation API available at http://{}", server.addr());

    let served = server
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Received Ctrl+C, shutting down...");
        })
        .await;

    let _ = shutdown_tx.send(());
    if let Err(e) = dispatch.await {
        warn!("Dispatch loop ended abnormally: {}", e);
    }

    served?;
    info!("simjobs stopped");
    Ok(())
}
