// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use crate::logger;

/// Resolve once a shutdown signal arrives
///
/// If a handler cannot be registered the error is logged and that signal is
/// ignored; the other one still triggers shutdown.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let wait_for = |kind: SignalKind, name: &'static str| async move {
        match signal(kind) {
            Ok(mut stream) => {
                stream.recv().await;
                name
            }
            Err(e) => {
                logger::log_error(&format!("Failed to register {name} handler: {e}"));
                std::future::pending().await
            }
        }
    };

    let name = tokio::select! {
        name = wait_for(SignalKind::interrupt(), "SIGINT") => name,
        name = wait_for(SignalKind::terminate(), "SIGTERM") => name,
    };
    logger::log_signal_received(name);
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logger::log_signal_received("Ctrl+C"),
        Err(e) => {
            logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
            std::future::pending::<()>().await;
        }
    }
}
