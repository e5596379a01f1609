//! Logging for the trader.

mod logging;

pub use logging::{setup_logging, LoggingError, LOG_FILE_PREFIX};
pub use tracing_appender::non_blocking::WorkerGuard;
