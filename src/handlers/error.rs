// src/handlers/error.rs
use std::fmt;
use warp::reject::Reject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Report artifact missing or corrupt; blocks the briefing.
    Report,
    /// No render cycle has completed yet.
    NotReady,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn report_error(message: impl Into<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::Report,
            message: message.into(),
        }
    }

    pub fn not_ready(message: impl Into<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::NotReady,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}
