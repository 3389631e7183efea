use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::internal::logger::LogLevel;

// Build metadata below comes from the vergen build script
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix of environment variables that override configuration, e.g. `PROCLOG_LEVEL`.
pub const ENV_PREFIX: &str = "PROCLOG";

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_NAME: &str = "proclog";

/// Get version information
pub fn get_version_info() -> String {
    let build_timestamp = option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown");
    let rustc_semver = option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown");
    let cargo_target_triple = option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown");

    format!(
        "{} (built {}, rustc {}, {})",
        VERSION, build_timestamp, rustc_semver, cargo_target_triple
    )
}

/// Logger configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_formatter")]
    pub formatter: String,
    #[serde(default = "default_true")]
    pub color: bool,
    #[serde(default)]
    pub disable_stacktrace: bool,
}

fn default_output() -> String {
    "stdout".to_string()
}
fn default_formatter() -> String {
    "console".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            output: default_output(),
            formatter: default_formatter(),
            color: default_true(),
            disable_stacktrace: false,
        }
    }
}

impl LogConfig {
    /// Layer defaults, a config file and `PROCLOG_*` environment variables.
    ///
    /// An explicit `path` must exist; without one, `./proclog.{yaml,toml,json}`
    /// is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("level", LogLevel::default().as_str())?
            .set_default("output", default_output())?
            .set_default("formatter", default_formatter())?
            .set_default("color", true)?
            .set_default("disable_stacktrace", false)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        config.try_deserialize()
    }

    /// Parse a YAML document such as the `log:` section of a host config.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}
