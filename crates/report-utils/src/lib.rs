//! Shared utilities for ticker-report
//!
//! This crate provides common functionality used across the workspace:
//! tracing setup and typed access to environment variables.

pub mod config;
pub mod logging;

pub use config::{EnvError, env_string, env_var};
pub use logging::{LogFormat, init_tracing};
