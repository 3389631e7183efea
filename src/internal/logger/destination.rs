// src/internal/logger/destination.rs

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;
use url::Url;

use super::error::LogError;
use super::timestamp::{time_encoder_for, EncoderKind};

/// Where encoded records are written.
///
/// Cloning is cheap; clones share the same underlying file handle.
#[derive(Debug, Clone)]
pub enum Destination {
    Stdout,
    Stderr,
    File {
        path: Arc<PathBuf>,
        file: Arc<Mutex<File>>,
    },
}

impl Destination {
    /// Resolve an output string: `stdout`, `stderr`, a path, or a `file://` URL.
    pub fn open(output: &str) -> Result<Self, LogError> {
        match output {
            "" => Err(LogError::EmptyOutput),
            "stdout" => Ok(Destination::Stdout),
            "stderr" => Ok(Destination::Stderr),
            _ if output.contains("://") => {
                let url = Url::parse(output).map_err(|_| LogError::InvalidFileUrl(output.to_string()))?;
                if url.scheme() != "file" {
                    return Err(LogError::UnsupportedScheme {
                        scheme: url.scheme().to_string(),
                        output: output.to_string(),
                    });
                }
                if url.host().is_some() {
                    return Err(LogError::InvalidFileUrl(output.to_string()));
                }
                let path = url
                    .to_file_path()
                    .map_err(|_| LogError::InvalidFileUrl(output.to_string()))?;
                Self::open_file(&path)
            }
            _ => Self::open_file(Path::new(output)),
        }
    }

    fn open_file(path: &Path) -> Result<Self, LogError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LogError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Destination::File {
            path: Arc::new(path.to_path_buf()),
            file: Arc::new(Mutex::new(file)),
        })
    }

    pub fn is_terminal_stream(&self) -> bool {
        matches!(self, Destination::Stdout | Destination::Stderr)
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Destination::File { path, .. } => Some(path.as_path()),
            _ => None,
        }
    }

    /// Flush buffered output; files are synced to disk.
    pub fn sync(&self) -> io::Result<()> {
        match self {
            Destination::Stdout => io::stdout().flush(),
            Destination::Stderr => io::stderr().flush(),
            Destination::File { file, .. } => {
                let file = file.lock().unwrap_or_else(PoisonError::into_inner);
                file.sync_all()
            }
        }
    }
}

/// A writer holding the destination's lock for the duration of one record.
pub enum DestinationWriter<'a> {
    Stdout(io::StdoutLock<'static>),
    Stderr(io::StderrLock<'static>),
    File(MutexGuard<'a, File>),
}

/// Write `buf`, reporting a failure to the same writer.
///
/// Error output shares the destination with normal output.
fn write_reporting<W: Write + ?Sized>(out: &mut W, buf: &[u8]) -> io::Result<usize> {
    let result = out.write(buf);
    match &result {
        // retried by write_all, not a failure
        Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
        Err(err) => report(out, err),
        Ok(_) => {}
    }
    result
}

fn report<W: Write + ?Sized>(out: &mut W, err: &io::Error) {
    let mut line = String::new();
    let now = chrono::Local::now().naive_local();
    if time_encoder_for(EncoderKind::ErrorOutput)
        .encode_time(&now, &mut line)
        .is_err()
    {
        line.clear();
    }
    line.push_str(&format!(" write error: {err}\n"));
    let _ = out.write(line.as_bytes());
}

impl Write for DestinationWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            DestinationWriter::Stdout(out) => write_reporting(out, buf),
            DestinationWriter::Stderr(out) => write_reporting(out, buf),
            DestinationWriter::File(file) => write_reporting(&mut **file, buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            DestinationWriter::Stdout(out) => out.flush(),
            DestinationWriter::Stderr(out) => out.flush(),
            DestinationWriter::File(file) => file.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for Destination {
    type Writer = DestinationWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        match self {
            Destination::Stdout => DestinationWriter::Stdout(io::stdout().lock()),
            Destination::Stderr => DestinationWriter::Stderr(io::stderr().lock()),
            Destination::File { file, .. } => {
                DestinationWriter::File(file.lock().unwrap_or_else(PoisonError::into_inner))
            }
        }
    }
}
