//! Utility modules supporting the search pipeline.
//!
//! - [`HttpClient`]: shared reqwest client with the crate user agent
//! - [`parse_duration`]: parse "30s" / "500ms" / "2m" style durations

mod duration;
mod http;

pub use duration::parse_duration;
pub use http::{HttpClient, DEFAULT_USER_AGENT};
