pub mod cli;
pub mod internal;

// Re-export commonly used types
pub use internal::config::LogConfig;
pub use internal::logger::{
    current_logger, ensure_initialized, init, is_debug_enabled, try_init, LogError, LogLevel, Logger,
};

// Used by the log_* macros
#[doc(hidden)]
pub use tracing;
