//! Host bootstrap: configuration, logging and shutdown signals.

pub mod config;
pub mod logging;
pub mod signals;

pub use config::{AppConfig, CliArgs, LogFormat, LoggingConfig, ServerConfig};
pub use logging::init_logging;
pub use signals::{ShutdownSignal, cancel_on_shutdown, wait_for_shutdown};
