//! Two small HTTP servers sharing one stack.
//!
//! - The compute server answers a status message, app info and a safe
//!   division endpoint.
//! - The document server serves an HTML index, the server time, a single
//!   persisted JSON document and an echo endpoint.
//!
//! Both listen on `PORT` (default 3000) and drain in-flight requests on
//! SIGINT/SIGTERM.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod math;
pub mod server;
pub mod store;

use std::process::ExitCode;
use std::sync::Arc;

pub use handler::App;

/// Exit code for configuration, logging or bind failures
const STARTUP_FAILURE: u8 = 2;

/// Load configuration, start `app` and block until it has shut down
///
/// The first command-line argument, if any, is the config file path
/// (without extension).
pub fn run(app: App) -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());

    match start(app, &config_path) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            logger::log_error(&format!("{} server failed to start: {e}", app.name()));
            ExitCode::from(STARTUP_FAILURE)
        }
    }
}

fn start(app: App, config_path: &str) -> Result<server::ShutdownOutcome, Box<dyn std::error::Error>> {
    let cfg = config::Config::load_from(config_path)?;
    logger::init(&cfg)?;

    // Create Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("Using {workers} worker threads"));
    } else {
        logger::log_info("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;
    let outcome = runtime.block_on(async_main(app, cfg))?;

    // Do not wait on connections that outlived the drain
    runtime.shutdown_background();
    Ok(outcome)
}

async fn async_main(
    app: App,
    cfg: config::Config,
) -> Result<server::ShutdownOutcome, Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let store = Arc::new(store::FileStore::new(&cfg.storage.data_file));
    let state = Arc::new(config::AppState::new(&cfg, store));

    let server = server::Server::bind(addr, state, app)
        .map_err(|e| format!("failed to bind {addr}: {e}"))?;
    logger::log_server_start(app.name(), &server.local_addr()?, &cfg);

    Ok(server.run(server::shutdown_signal()).await)
}
