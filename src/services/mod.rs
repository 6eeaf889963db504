// src/services/mod.rs
pub mod ambient;
pub mod cache;
pub mod merge;
pub mod refresh;
pub mod report;
pub mod usgs;

use std::fmt;

/// Errors from the live feed clients. Always recovered at the merge
/// boundary; a failed feed degrades to placeholder display values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Non-2xx HTTP response from the feed endpoint.
    Status(u16),
    /// Transport-level failure, including timeouts.
    Transport(String),
    /// The response body did not have the expected shape.
    MalformedPayload(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status(code) => write!(f, "feed returned HTTP {}", code),
            FetchError::Transport(msg) => write!(f, "feed unreachable: {}", msg),
            FetchError::MalformedPayload(msg) => write!(f, "malformed feed payload: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}
