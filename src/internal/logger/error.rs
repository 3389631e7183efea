// src/internal/logger/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a logger.
///
/// Every variant is an initialization fault: there is no logger to fall back
/// on once one of these is returned.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("log output must not be empty")]
    EmptyOutput,

    #[error("no sink registered for scheme {scheme:?} in output {output:?}")]
    UnsupportedScheme { scheme: String, output: String },

    #[error("invalid file URL {0:?}: must be an absolute path without a host")]
    InvalidFileUrl(String),

    #[error("couldn't open log output {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unrecognized level: {0:?}")]
    InvalidLevel(String),
}
