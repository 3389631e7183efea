// src/internal/config/mod.rs

pub mod config;

pub use self::config::{get_version_info, LogConfig, VERSION};
