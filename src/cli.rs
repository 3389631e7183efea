use std::io::BufRead;
use std::path::Path;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::internal::config::{get_version_info, LogConfig};
use crate::internal::logger::{LogLevel, Logger};

fn parse_level(raw: &str) -> Result<LogLevel, String> {
    raw.parse::<LogLevel>().map_err(|e| e.to_string())
}

pub fn build_cli() -> Command {
    // Leak the version string to get a 'static lifetime
    let version: &'static str = Box::leak(get_version_info().into_boxed_str());

    Command::new("proclog")
        .version(version)
        .about("Write console-encoded log records from the command line")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Path to config file (default: ./proclog.yaml if present)")
        )
        .arg(
            Arg::new("level")
                .long("level")
                .short('l')
                .value_parser(parse_level)
                .help("Minimum level to write (trace|debug|info|warn|error)")
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Destination: stdout, stderr, a file path or a file:// URL")
        )
        .arg(
            Arg::new("formatter")
                .long("formatter")
                .help("Encoding style (only console is supported)")
        )
        .arg(
            Arg::new("name")
                .long("name")
                .short('n')
                .help("Logger name stamped on every record")
        )
        .arg(
            Arg::new("priority")
                .long("priority")
                .short('p')
                .value_parser(parse_level)
                .default_value("info")
                .help("Level of the records written")
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Disable colored level labels")
        )
        .arg(
            Arg::new("no-stacktrace")
                .long("no-stacktrace")
                .action(ArgAction::SetTrue)
                .help("Do not attach stack traces to warn and error records")
        )
        .arg(
            Arg::new("message")
                .num_args(1..)
                .help("Message to write; stdin lines are written when omitted")
        )
}

/// Load file and environment configuration, then apply command-line overrides.
pub fn parse_config(matches: &ArgMatches) -> anyhow::Result<LogConfig> {
    let path = matches.get_one::<String>("config").map(Path::new);
    let mut config = LogConfig::load(path).context("failed to load configuration")?;

    if let Some(level) = matches.get_one::<LogLevel>("level") {
        config.level = *level;
    }
    if let Some(output) = matches.get_one::<String>("output") {
        config.output = output.clone();
    }
    if let Some(formatter) = matches.get_one::<String>("formatter") {
        config.formatter = formatter.clone();
    }
    if matches.get_flag("no-color") {
        config.color = false;
    }
    if matches.get_flag("no-stacktrace") {
        config.disable_stacktrace = true;
    }

    Ok(config)
}

/// Write the message arguments, or every non-empty line of `input`.
///
/// Returns the number of records written.
pub fn run(matches: &ArgMatches, logger: &Logger, input: impl BufRead) -> anyhow::Result<usize> {
    let priority = matches
        .get_one::<LogLevel>("priority")
        .copied()
        .unwrap_or_default();

    let logger = match matches.get_one::<String>("name") {
        Some(name) => logger.named(name),
        None => logger.clone(),
    };

    if let Some(words) = matches.get_many::<String>("message") {
        let message = words.map(String::as_str).collect::<Vec<_>>().join(" ");
        logger.log(priority, &message);
        return Ok(1);
    }

    let mut written = 0;
    for line in input.lines() {
        let line = line.context("failed to read input")?;
        if line.is_empty() {
            continue;
        }
        logger.log(priority, &line);
        written += 1;
    }
    Ok(written)
}
