// src/internal/logger/mod.rs

//! Process-wide logger.
//!
//! The current logger and its debug flag live together in one immutable
//! snapshot behind an [`ArcSwap`]. Initializing replaces the whole snapshot,
//! so readers always see a logger and a flag built from the same config.
//!
//! The first access of any kind installs a default logger (`info` to
//! `stdout`), so there is no window where the state is empty.

pub mod destination;
pub mod encoder;
pub mod error;
pub mod level;
pub mod logger;
pub mod timestamp;

use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use tracing::Level;

use crate::internal::config::LogConfig;

pub use destination::Destination;
pub use error::LogError;
pub use level::LogLevel;
pub use logger::Logger;

struct Snapshot {
    logger: Arc<Logger>,
    debug_enabled: bool,
}

impl Snapshot {
    fn build(cfg: &LogConfig) -> Result<Self, LogError> {
        let logger = Logger::build(cfg)?;
        let debug_enabled = Level::DEBUG <= cfg.level.as_filter();
        Ok(Self {
            logger: Arc::new(logger),
            debug_enabled,
        })
    }

    fn build_or_abort(cfg: &LogConfig) -> Self {
        match Self::build(cfg) {
            Ok(snapshot) => snapshot,
            Err(err) => panic!("failed to initialize logger: {err}"),
        }
    }
}

static STATE: OnceLock<ArcSwap<Snapshot>> = OnceLock::new();

fn state() -> &'static ArcSwap<Snapshot> {
    STATE.get_or_init(|| ArcSwap::from_pointee(Snapshot::build_or_abort(&LogConfig::default())))
}

/// Install the default logger if nothing has been installed yet.
pub fn ensure_initialized() {
    state();
}

/// Build a logger from `cfg` and make it the process-wide logger.
///
/// A logger that cannot be built is a startup fault: this panics with the
/// cause and leaves the previous logger in place. Use [`try_init`] to handle
/// the error instead.
pub fn init(cfg: &LogConfig) {
    let snapshot = Snapshot::build_or_abort(cfg);
    state().store(Arc::new(snapshot));
}

/// Like [`init`], but returns the construction error.
pub fn try_init(cfg: &LogConfig) -> Result<(), LogError> {
    let snapshot = Snapshot::build(cfg)?;
    state().store(Arc::new(snapshot));
    Ok(())
}

/// The most recently installed logger.
pub fn current_logger() -> Arc<Logger> {
    state().load().logger.clone()
}

/// Whether the most recently installed logger admits debug records.
pub fn is_debug_enabled() -> bool {
    state().load().debug_enabled
}

// Convenience logging macros, written through the process-wide logger
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if $crate::internal::logger::is_debug_enabled() {
            $crate::internal::logger::current_logger().in_scope(|| $crate::tracing::debug!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::internal::logger::current_logger().in_scope(|| $crate::tracing::info!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::internal::logger::current_logger().in_scope(|| $crate::tracing::warn!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::internal::logger::current_logger().in_scope(|| $crate::tracing::error!($($arg)*))
    };
}
