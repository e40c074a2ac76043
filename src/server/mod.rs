// Server module entry point
// Listener setup, connection handling, lifecycle and graceful shutdown

pub mod connection;
pub mod lifecycle;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used types
pub use lifecycle::{Lifecycle, LifecycleState, ShutdownOutcome};
pub use listener::create_listener;
pub use server_loop::Server;
pub use signal::shutdown_signal;
