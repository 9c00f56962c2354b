//! Shared utilities for filing-rs
//!
//! Logging setup and environment-backed configuration helpers used by the
//! analyst library and the command-line binary.

pub mod config;
pub mod logging;

pub use config::{ConfigError, env_or, env_parse, env_var, load_dotenv};
pub use logging::{LogFormat, init_tracing};
