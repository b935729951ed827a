//! Shared utilities for the dVITA client.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
