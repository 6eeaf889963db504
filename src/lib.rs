// src/lib.rs

// Re-export or define the top-level modules you need
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

// Common boxed-error alias used by the manual test binaries
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
