//! HTTP protocol layer module
//!
//! Response builders, request body parsing and query decoding, shared by
//! both servers and independent of any route logic.

pub mod body;
pub mod query;
pub mod response;

// Re-export commonly used items
pub use body::parse_json_body;
pub use query::{parse_query, QueryParams};
pub use response::{
    build_404_response, build_internal_error_response, error_response, html_response,
    json_response, text_response,
};
