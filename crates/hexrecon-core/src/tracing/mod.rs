//! Observability for hexrecon.
//! `tracing` crate with `EnvFilter`, per-module log levels.

pub mod setup;

pub use setup::{init_tracing, init_tracing_with, select_filter, LOG_ENV_VAR};
