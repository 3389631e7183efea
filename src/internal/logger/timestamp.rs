// src/internal/logger/timestamp.rs

//! Timestamp rendering for the console encoder.
//!
//! Two strategies render the same layout. [`LayoutTimeEncoder`] streams the
//! formatted time straight into a `fmt::Write` line; [`StringTimeEncoder`]
//! materializes it as a `String` first and appends that. Which one an
//! encoder uses is decided once, from its kind, when it is constructed.

use std::fmt::{self, Write};

use chrono::NaiveDateTime;

/// `YYYY-MM-DD HH:MM:SS.mmm`
pub const TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub trait TimeEncoder: Send + Sync + 'static {
    fn encode_time(&self, time: &NaiveDateTime, out: &mut dyn Write) -> fmt::Result;
}

/// Writes the layout directly into the output.
#[derive(Debug, Default, Clone, Copy)]
pub struct LayoutTimeEncoder;

impl TimeEncoder for LayoutTimeEncoder {
    fn encode_time(&self, time: &NaiveDateTime, out: &mut dyn Write) -> fmt::Result {
        write!(out, "{}", time.format(TIME_LAYOUT))
    }
}

/// Formats into a string, then appends the string.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringTimeEncoder;

impl StringTimeEncoder {
    pub fn format(&self, time: &NaiveDateTime) -> String {
        time.format(TIME_LAYOUT).to_string()
    }
}

impl TimeEncoder for StringTimeEncoder {
    fn encode_time(&self, time: &NaiveDateTime, out: &mut dyn Write) -> fmt::Result {
        out.write_str(&self.format(time))
    }
}

/// The encoders that render timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderKind {
    /// Record lines, written into the subscriber's line writer.
    Console,
    /// Internal error notes, assembled as bytes for the raw destination.
    ErrorOutput,
}

/// Picks the timestamp strategy for an encoder kind.
pub fn time_encoder_for(kind: EncoderKind) -> Box<dyn TimeEncoder> {
    match kind {
        EncoderKind::Console => Box::new(LayoutTimeEncoder),
        EncoderKind::ErrorOutput => Box::new(StringTimeEncoder),
    }
}
