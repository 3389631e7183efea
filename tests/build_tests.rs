//! `Logger::build` against file outputs; no process-wide state involved.

use proclog::{LogConfig, LogError, LogLevel, Logger};

mod fixtures;

use fixtures::TestLog;

#[test]
fn test_records_below_level_are_dropped() {
    let log = TestLog::new();
    let logger = Logger::build(&log.config(LogLevel::Warn)).unwrap();

    logger.info("quiet");
    logger.warn("loud");
    logger.in_scope(|| tracing::debug!("also quiet"));
    logger.sync().unwrap();

    let contents = log.contents();
    assert!(!contents.contains("quiet"));
    assert!(contents.contains("\tWARN\t"));
    assert!(contents.contains("\tloud"));
}

#[test]
fn test_named_loggers_nest() {
    let log = TestLog::new();
    let logger = Logger::build(&log.config(LogLevel::Info)).unwrap();

    let db = logger.named("app").named("db");
    assert_eq!(db.name(), Some("app.db"));
    assert_eq!(logger.name(), None);

    db.info("connected");

    let contents = log.contents();
    assert!(contents.contains("\tINFO\tapp.db\t"), "{contents}");
}

#[test]
fn test_structured_fields_are_json() {
    let log = TestLog::new();
    let logger = Logger::build(&log.config(LogLevel::Info)).unwrap();

    logger.in_scope(|| tracing::info!(attempt = 2, host = "db1", "retrying"));

    let contents = log.contents();
    assert!(contents.contains("\tretrying\t{\"attempt\":2,\"host\":\"db1\"}\n"), "{contents}");
}

#[test]
fn test_color_applies_to_file_output() {
    let log = TestLog::new();
    let cfg = LogConfig {
        color: true,
        ..log.config(LogLevel::Info)
    };
    let logger = Logger::build(&cfg).unwrap();

    logger.error("disk full");

    let contents = log.contents();
    let line = contents.lines().next().unwrap();
    let (time, rest) = line.split_once('\t').unwrap();
    // the timestamp is never styled
    assert_eq!(time.len(), 23, "{line}");
    assert!(!time.contains('\x1b'));
    assert!(rest.starts_with("\x1b[31mERROR\x1b[0m\t"), "{line}");
}

#[test]
fn test_no_color_writes_plain_labels() {
    let log = TestLog::new();
    let logger = Logger::build(&log.config(LogLevel::Info)).unwrap();

    logger.error("plain");

    let contents = log.contents();
    assert!(!contents.contains('\x1b'));
    assert!(contents.contains("\tERROR\t"));
}

#[test]
fn test_unknown_formatter_warns() {
    let log = TestLog::new();
    let cfg = LogConfig {
        formatter: "json".to_string(),
        ..log.config(LogLevel::Info)
    };

    Logger::build(&cfg).unwrap();

    let contents = log.contents();
    assert!(contents.contains("\tWARN\t"), "{contents}");
    assert!(contents.contains("formatter \"json\" is not supported"), "{contents}");
}

#[test]
fn test_unknown_formatter_warns_above_warn_level() {
    let log = TestLog::new();
    let cfg = LogConfig {
        formatter: "json".to_string(),
        ..log.config(LogLevel::Error)
    };

    let logger = Logger::build(&cfg).unwrap();
    logger.warn("filtered");

    let contents = log.contents();
    assert!(contents.contains("formatter \"json\" is not supported"), "{contents}");
    assert!(!contents.contains("filtered"));
}

#[test]
fn test_unopenable_output_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("app.log");

    let err = Logger::build(&LogConfig {
        output: path.to_str().unwrap().to_string(),
        ..LogConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, LogError::Open { .. }));
}
