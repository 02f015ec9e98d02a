//! Shared utilities for the disperse workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
