// File access for GPX sources

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use log::debug;
use snafu::ResultExt;

use crate::errors::{FileReadSnafu, GpxSplitError};

const FILE_URI_SCHEME: &str = "file://";

/// Trait defining how raw track files are read from storage.
///
/// Implementations must return the whole file or fail; callers never see a
/// partially read file.
pub trait FileStore: Send + Sync {
    /// Read the file identified by `reference` into memory
    fn read_to_string(&self, reference: &str) -> Result<String, GpxSplitError>;
}

/// Reads files from the local filesystem.
///
/// References may be plain paths or `file://` URIs.
#[derive(Debug, Default, Clone)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a reference to a filesystem path
    pub fn resolve(reference: &str) -> PathBuf {
        PathBuf::from(reference.strip_prefix(FILE_URI_SCHEME).unwrap_or(reference))
    }
}

impl FileStore for LocalFileStore {
    fn read_to_string(&self, reference: &str) -> Result<String, GpxSplitError> {
        let path = Self::resolve(reference);
        debug!("Reading {:?}", path);
        fs::read_to_string(&path).context(FileReadSnafu { reference })
    }
}

/// Serves files from memory and counts every read. Handy for tests and for
/// driving screens without touching the disk.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: HashMap<String, String>,
    reads: AtomicUsize,
    delay: Option<Duration>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, reference: &str, contents: &str) -> Self {
        self.files
            .insert(reference.to_string(), contents.to_string());
        self
    }

    /// Hold every read for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl FileStore for MemoryFileStore {
    fn read_to_string(&self, reference: &str) -> Result<String, GpxSplitError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.files
            .get(reference)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
            .context(FileReadSnafu { reference })
    }
}
