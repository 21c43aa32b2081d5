//! Shared helpers for integration tests.
//!
//! # Modules
//!
//! - `logger`: per-test progress logging to stderr
//! - `log_capture`: capture of the crate's own `tracing` events

pub mod log_capture;
pub mod logger;
