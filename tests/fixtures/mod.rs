//! Test fixtures for logger tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use proclog::{LogConfig, LogLevel};
use tempfile::TempDir;

static GLOBAL_STATE: Mutex<()> = Mutex::new(());

/// Serialize tests that replace the process-wide logger.
///
/// Tests that are expected to panic poison the lock, which is harmless here.
pub fn lock_global_state() -> MutexGuard<'static, ()> {
    GLOBAL_STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A temporary directory holding one log file.
pub struct TestLog {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestLog {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");
        Self { _dir: dir, path }
    }

    pub fn config(&self, level: LogLevel) -> LogConfig {
        LogConfig {
            level,
            output: self.path.to_str().unwrap().to_string(),
            color: false,
            disable_stacktrace: true,
            ..LogConfig::default()
        }
    }

    pub fn contents(&self) -> String {
        read(&self.path)
    }
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}
