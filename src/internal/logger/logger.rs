// src/internal/logger/logger.rs

use std::io::{self, Write};
use std::panic::Location;
use std::sync::Arc;

use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, Layer};

use super::destination::Destination;
use super::encoder::{short_caller, ConsoleEncoder, RecordFields};
use super::error::LogError;
use super::level::LogLevel;
use crate::internal::config::LogConfig;

/// Formatter names that select the console encoder.
const CONSOLE_FORMATTERS: [&str; 2] = ["", "console"];

/// A structured logger writing console-encoded records to one destination.
///
/// Cloning shares the underlying subscriber and destination.
#[derive(Debug, Clone)]
pub struct Logger {
    dispatch: Dispatch,
    destination: Destination,
    level: LogLevel,
    name: Option<Arc<str>>,
}

impl Logger {
    /// Build a logger from configuration, opening its destination.
    pub fn build(cfg: &LogConfig) -> Result<Self, LogError> {
        let destination = Destination::open(&cfg.output)?;
        let colored = cfg.color;

        if !CONSOLE_FORMATTERS.contains(&cfg.formatter.as_str()) {
            // written past the level filter so it shows even at `error`
            let notice = RecordFields {
                message: Some(format!(
                    "formatter {:?} is not supported, using console",
                    cfg.formatter
                )),
                ..Default::default()
            };
            let mut buf = String::new();
            if ConsoleEncoder::new(colored, false)
                .encode(LogLevel::Warn, Some(file!()), Some(line!()), notice, &mut buf)
                .is_ok()
            {
                let _ = destination.make_writer().write_all(buf.as_bytes());
            }
        }

        let layer = fmt::layer()
            .event_format(ConsoleEncoder::new(colored, !cfg.disable_stacktrace))
            .with_writer(destination.clone())
            .with_ansi(colored)
            .log_internal_errors(false)
            .with_filter(cfg.level.as_filter());

        let logger = Self {
            dispatch: Dispatch::new(tracing_subscriber::registry().with(layer)),
            destination,
            level: cfg.level,
            name: None,
        };

        Ok(logger)
    }

    /// A child logger that stamps its records with `name`.
    ///
    /// Names nest with a dot, so `named("db")` on a logger named `app`
    /// yields `app.db`.
    pub fn named(&self, name: &str) -> Self {
        let name: Arc<str> = match &self.name {
            Some(parent) if !name.is_empty() => format!("{parent}.{name}").into(),
            Some(parent) => parent.clone(),
            None => name.into(),
        };
        Self {
            name: Some(name),
            ..self.clone()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.level.enables(level)
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger as the thread's default subscriber, so plain
    /// `tracing` macros inside it are written here.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let location = Location::caller();
        let caller = short_caller(location.file(), location.line());
        let name = self.name.as_deref();

        self.in_scope(|| match level {
            LogLevel::Trace => tracing::trace!(logger = name, caller = caller.as_str(), "{}", message),
            LogLevel::Debug => tracing::debug!(logger = name, caller = caller.as_str(), "{}", message),
            LogLevel::Info => tracing::info!(logger = name, caller = caller.as_str(), "{}", message),
            LogLevel::Warn => tracing::warn!(logger = name, caller = caller.as_str(), "{}", message),
            LogLevel::Error => tracing::error!(logger = name, caller = caller.as_str(), "{}", message),
        });
    }

    #[track_caller]
    pub fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }

    #[track_caller]
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    #[track_caller]
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    #[track_caller]
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Flush the destination.
    pub fn sync(&self) -> io::Result<()> {
        self.destination.sync()
    }
}
