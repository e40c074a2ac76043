//! Request handler module
//!
//! Route tables and handlers for the compute and document servers.

mod compute;
mod documents;
pub mod router;
mod types;

// Re-export main entry point
pub use router::{handle_request, resolve, App, Route};
