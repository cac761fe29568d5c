use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use taixiu_tracker::api::{self, AppState};
use taixiu_tracker::collector::{FeedPoller, HttpFeedSource};
use taixiu_tracker::config::{AppConfig, LoggingConfig};
use taixiu_tracker::coordination::{install_signal_handlers, GracefulShutdown, ShutdownSignal};
use taixiu_tracker::domain::FeedKind;
use taixiu_tracker::error::{Result, TrackerError};
use taixiu_tracker::services::{FeedRegistry, HealthState};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Successful fetches older than this many poll intervals mark a feed degraded
const STALE_POLL_INTERVALS: u32 = 3;

/// Spawn both pollers and serve the read API until shutdown
pub async fn run_service(config: AppConfig) -> Result<()> {
    config
        .validate()
        .map_err(|errors| TrackerError::InvalidConfig(errors.join("; ")))?;

    let host: IpAddr = config.server.host.parse().map_err(|e| {
        TrackerError::InvalidConfig(format!("server.host {}: {}", config.server.host, e))
    })?;
    let addr = SocketAddr::new(host, config.server.port);

    info!("Starting TaiXiu feed tracker...");

    let shutdown = Arc::new(GracefulShutdown::new());
    install_signal_handlers(Arc::clone(&shutdown)).await;

    let feeds = FeedRegistry::new(config.history.max_len);
    let mut pollers = Vec::new();
    for kind in FeedKind::ALL {
        let source = HttpFeedSource::new(&config.upstream, kind)?;
        info!("Polling {} feed gid={}", kind, source.gid());
        let poller = FeedPoller::new(source, Arc::clone(feeds.get(kind)), &config.poller);
        pollers.push(tokio::spawn(poller.run(shutdown.token())));
    }

    let health = HealthState::new(config.poller.poll_interval() * STALE_POLL_INTERVALS);
    let state = AppState::new(feeds, health);

    let served = api::serve(state, addr, shutdown.token()).await;
    if let Err(ref e) = served {
        error!("API server stopped: {}", e);
        shutdown.request_shutdown(ShutdownSignal::Internal);
    }

    for poller in pollers {
        if let Err(e) = poller.await {
            error!("Poller task failed: {}", e);
        }
    }

    info!("Shutdown complete");
    served
}

pub fn init_logging(logging: &LoggingConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},hyper=warn,reqwest=warn", logging.level))
    });

    // File logging only when TAIXIU_LOG_DIR is set
    let file_layer = std::env::var("TAIXIU_LOG_DIR").ok().and_then(|log_dir| {
        // `tracing_appender::rolling::daily` panics if it can't create the initial file,
        // so preflight writability.
        let test_path = std::path::Path::new(&log_dir).join(".taixiu_write_test");
        let writable = std::fs::create_dir_all(&log_dir).is_ok()
            && std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&test_path)
                .is_ok();
        if !writable {
            eprintln!(
                "Warning: Could not write to log directory {}, file logging disabled",
                log_dir
            );
            return None;
        }
        let _ = std::fs::remove_file(&test_path);

        let file_appender = tracing_appender::rolling::daily(&log_dir, "taixiu.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // Keep the guard alive for the life of the process
        Box::leak(Box::new(guard));

        eprintln!("Logging to: {}/taixiu.log", log_dir);
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
    });

    let (json_layer, console_layer) = if logging.json {
        (Some(tracing_subscriber::fmt::layer().json().with_target(true)), None)
    } else {
        (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            ),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .with(file_layer)
        .init();
}

pub fn init_logging_simple() {
    // Minimal logging for CLI commands
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}
