// src/internal/logger/encoder.rs

//! Console encoder.
//!
//! Each record becomes one tab-separated line:
//!
//! ```text
//! 2024-03-05 07:08:09.123	INFO	worker	logger/encoder.rs:42	started	{"jobs":3}
//! ```
//!
//! The name and caller columns are omitted when empty, the JSON object only
//! appears when the record carries extra fields, and a stack trace follows on
//! the next lines for `WARN` and above unless disabled.

use std::backtrace::Backtrace;
use std::fmt::{self, Write};

use chrono::NaiveDateTime;
use serde_json::{Map, Number, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::level::LogLevel;
use super::timestamp::{time_encoder_for, EncoderKind, TimeEncoder};

/// Field that carries the logger name of a record.
pub const NAME_FIELD: &str = "logger";
/// Field that overrides the caller taken from the callsite metadata.
pub const CALLER_FIELD: &str = "caller";
const MESSAGE_FIELD: &str = "message";

/// Column keys. A column with an empty key is left out of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKeys {
    pub time: &'static str,
    pub level: &'static str,
    pub name: &'static str,
    pub caller: &'static str,
    pub message: &'static str,
    pub stacktrace: &'static str,
}

impl Default for FieldKeys {
    fn default() -> Self {
        Self {
            time: "T",
            level: "L",
            name: "N",
            caller: "C",
            message: "M",
            stacktrace: "S",
        }
    }
}

const RESET: &str = "\x1b[0m";

fn level_color(level: LogLevel) -> u8 {
    match level {
        LogLevel::Trace => 36,
        LogLevel::Debug => 35,
        LogLevel::Info => 34,
        LogLevel::Warn => 33,
        LogLevel::Error => 31,
    }
}

fn column(first: &mut bool, out: &mut dyn Write) -> fmt::Result {
    if !std::mem::replace(first, false) {
        out.write_char('\t')?;
    }
    Ok(())
}

/// Trim a source path to its last directory and file name, `dir/file.rs:line`.
pub fn short_caller(file: &str, line: u32) -> String {
    let is_sep = |c: char| c == '/' || c == '\\';
    let trimmed = match file.rfind(is_sep) {
        Some(last) => match file[..last].rfind(is_sep) {
            Some(prev) => &file[prev + 1..],
            None => file,
        },
        None => file,
    };
    format!("{trimmed}:{line}")
}

pub struct ConsoleEncoder {
    keys: FieldKeys,
    colored: bool,
    stacktrace: bool,
    time: Box<dyn TimeEncoder>,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

impl ConsoleEncoder {
    /// `colored` paints the level label; every destination gets the same
    /// bytes.
    pub fn new(colored: bool, stacktrace: bool) -> Self {
        Self {
            keys: FieldKeys::default(),
            colored,
            stacktrace,
            time: time_encoder_for(EncoderKind::Console),
            clock: local_now,
        }
    }

    pub fn with_keys(mut self, keys: FieldKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    fn write_time(&self, out: &mut dyn Write) -> fmt::Result {
        self.time.encode_time(&(self.clock)(), out)
    }

    fn write_level(&self, level: LogLevel, out: &mut dyn Write) -> fmt::Result {
        if self.colored {
            write!(out, "\x1b[{}m{}{}", level_color(level), level.capital(), RESET)
        } else {
            out.write_str(level.capital())
        }
    }

    /// Encode one record. `file`/`line` come from the callsite metadata.
    pub fn encode(
        &self,
        level: LogLevel,
        file: Option<&str>,
        line: Option<u32>,
        record: RecordFields,
        out: &mut dyn Write,
    ) -> fmt::Result {
        let mut first = true;

        if !self.keys.time.is_empty() {
            column(&mut first, out)?;
            self.write_time(out)?;
        }
        if !self.keys.level.is_empty() {
            column(&mut first, out)?;
            self.write_level(level, out)?;
        }
        if !self.keys.name.is_empty() {
            if let Some(name) = record.name.as_deref().filter(|n| !n.is_empty()) {
                column(&mut first, out)?;
                out.write_str(name)?;
            }
        }
        if !self.keys.caller.is_empty() {
            let caller = match (record.caller, file, line) {
                (Some(caller), _, _) => Some(caller),
                (None, Some(file), Some(line)) => Some(short_caller(file, line)),
                _ => None,
            };
            if let Some(caller) = caller {
                column(&mut first, out)?;
                out.write_str(&caller)?;
            }
        }
        if !self.keys.message.is_empty() {
            column(&mut first, out)?;
            out.write_str(record.message.as_deref().unwrap_or_default())?;
        }
        if !record.fields.is_empty() {
            column(&mut first, out)?;
            write!(out, "{}", Value::Object(record.fields))?;
        }
        out.write_char('\n')?;

        if self.stacktrace && !self.keys.stacktrace.is_empty() && level >= LogLevel::Warn {
            writeln!(out, "{}", Backtrace::force_capture())?;
        }
        Ok(())
    }
}

impl<S, N> FormatEvent<S, N> for ConsoleEncoder
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let mut record = RecordFields::default();
        event.record(&mut record);

        self.encode(
            LogLevel::from(metadata.level()),
            metadata.file(),
            metadata.line(),
            record,
            &mut writer,
        )
    }
}

/// Fields collected from one event.
#[derive(Debug, Default)]
pub struct RecordFields {
    pub message: Option<String>,
    pub name: Option<String>,
    pub caller: Option<String>,
    pub fields: Map<String, Value>,
}

impl RecordFields {
    fn put(&mut self, field: &Field, value: Value) {
        match field.name() {
            MESSAGE_FIELD => {
                self.message = Some(match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
            }
            NAME_FIELD => self.name = value.as_str().map(str::to_string),
            CALLER_FIELD => self.caller = value.as_str().map(str::to_string),
            // bridged `log` records carry their own metadata fields
            name if name.starts_with("log.") => {}
            name => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for RecordFields {
    fn record_f64(&mut self, field: &Field, value: f64) {
        let value = Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string()));
        self.put(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, Value::String(value.to_string()));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, Value::String(format!("{value:?}")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_milli_opt(7, 8, 9, 123)
            .unwrap()
    }

    fn encode(encoder: &ConsoleEncoder, level: LogLevel, record: RecordFields) -> String {
        let mut out = String::new();
        encoder
            .encode(level, Some("/home/dev/app/src/worker/pool.rs"), Some(42), record, &mut out)
            .unwrap();
        out
    }

    #[test]
    fn test_short_caller() {
        assert_eq!(short_caller("/a/b/c/file.rs", 7), "c/file.rs:7");
        assert_eq!(short_caller("src/lib.rs", 1), "src/lib.rs:1");
        assert_eq!(short_caller("lib.rs", 3), "lib.rs:3");
        assert_eq!(short_caller("C:\\proj\\src\\main.rs", 9), "src\\main.rs:9");
    }

    #[test]
    fn test_plain_line_layout() {
        let encoder = ConsoleEncoder::new(false, false).with_clock(fixed_clock);
        let record = RecordFields {
            message: Some("started".into()),
            ..Default::default()
        };

        assert_eq!(
            encode(&encoder, LogLevel::Info, record),
            "2024-03-05 07:08:09.123\tINFO\tworker/pool.rs:42\tstarted\n"
        );
    }

    #[test]
    fn test_name_and_fields_columns() {
        let encoder = ConsoleEncoder::new(false, false).with_clock(fixed_clock);
        let mut record = RecordFields {
            message: Some("done".into()),
            name: Some("scheduler".into()),
            ..Default::default()
        };
        record.fields.insert("jobs".into(), Value::from(3));

        assert_eq!(
            encode(&encoder, LogLevel::Debug, record),
            "2024-03-05 07:08:09.123\tDEBUG\tscheduler\tworker/pool.rs:42\tdone\t{\"jobs\":3}\n"
        );
    }

    #[test]
    fn test_explicit_caller_wins() {
        let encoder = ConsoleEncoder::new(false, false).with_clock(fixed_clock);
        let record = RecordFields {
            message: Some("x".into()),
            caller: Some("main.rs:1".into()),
            ..Default::default()
        };

        let line = encode(&encoder, LogLevel::Info, record);
        assert!(line.contains("\tmain.rs:1\t"));
        assert!(!line.contains("pool.rs"));
    }

    #[test]
    fn test_colored_level_and_plain_time() {
        let encoder = ConsoleEncoder::new(true, false).with_clock(fixed_clock);
        let record = RecordFields {
            message: Some("disk full".into()),
            ..Default::default()
        };

        assert_eq!(
            encode(&encoder, LogLevel::Error, record),
            "2024-03-05 07:08:09.123\t\x1b[31mERROR\x1b[0m\tworker/pool.rs:42\tdisk full\n"
        );
    }

    #[test]
    fn test_empty_key_drops_column() {
        let keys = FieldKeys {
            time: "",
            ..FieldKeys::default()
        };
        let encoder = ConsoleEncoder::new(false, false).with_keys(keys);
        let record = RecordFields {
            message: Some("m".into()),
            ..Default::default()
        };

        assert_eq!(encode(&encoder, LogLevel::Warn, record), "WARN\tworker/pool.rs:42\tm\n");
    }

    #[test]
    fn test_stacktrace_only_from_warn() {
        let encoder = ConsoleEncoder::new(false, true).with_clock(fixed_clock);

        let info = encode(&encoder, LogLevel::Info, RecordFields::default());
        assert_eq!(info.lines().count(), 1);

        let warn = encode(&encoder, LogLevel::Warn, RecordFields::default());
        assert!(warn.lines().count() > 1);
    }
}
