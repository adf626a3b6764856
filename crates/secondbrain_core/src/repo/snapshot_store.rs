//! Brain snapshot store contracts and JSON file implementation.
//!
//! # Responsibility
//! - Read and write the whole brain document in one call.
//! - Keep file layout and JSON encoding inside the persistence boundary.
//!
//! # Invariants
//! - A missing storage file reads as `Ok(None)`, never as an error.
//! - Writes always replace the full document; there are no partial writes.
//! - Documents are pretty-printed with 2-space indentation.

use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for brain documents.
#[derive(Debug)]
pub enum StoreError {
    /// Storage file exists but could not be read.
    Read { path: PathBuf, source: io::Error },
    /// Storage file was read but is not a valid brain document.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Document could not be written to the storage location.
    Write { path: PathBuf, source: io::Error },
    /// Document could not be encoded as JSON.
    Encode(serde_json::Error),
}

impl StoreError {
    /// Returns whether this error came from the read path.
    pub fn is_read_failure(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Parse { .. })
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid brain document `{}`: {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
            Self::Encode(err) => write!(f, "failed to encode brain document: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

/// On-disk brain document: `{"notes": {"<id>": {...}}}`.
///
/// Note records stay as raw JSON here so decoding errors are reported per
/// record by the model layer. Unknown top-level keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrainDocument {
    #[serde(default)]
    pub notes: BTreeMap<String, Value>,
}

/// How a document replaces the previous file contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Write a sibling temp file, then rename it over the target.
    #[default]
    Replace,
    /// Truncate the target and write in place. A crash mid-write can leave a
    /// truncated document behind.
    Overwrite,
}

/// Store interface for whole-document brain persistence.
pub trait NoteStore {
    /// Reads the current document, or `None` when nothing is stored yet.
    fn read_document(&self) -> StoreResult<Option<BrainDocument>>;
    /// Replaces the stored document.
    fn write_document(&self, document: &BrainDocument) -> StoreResult<()>;
    /// Storage location, for diagnostics.
    fn location(&self) -> &Path;
}

/// Single-file JSON store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    strategy: WriteStrategy,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_strategy(path, WriteStrategy::default())
    }

    pub fn with_strategy(path: impl Into<PathBuf>, strategy: WriteStrategy) -> Self {
        Self {
            path: path.into(),
            strategy,
        }
    }

    pub fn strategy(&self) -> WriteStrategy {
        self.strategy
    }

    fn write_error(&self, source: io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }

    fn write_replace(&self, bytes: &[u8]) -> io::Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(parent)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

impl NoteStore for JsonFileStore {
    fn read_document(&self) -> StoreResult<Option<BrainDocument>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    fn write_document(&self, document: &BrainDocument) -> StoreResult<()> {
        let started_at = Instant::now();
        let encoded = serde_json::to_string_pretty(document).map_err(StoreError::Encode)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| self.write_error(err))?;
            }
        }

        let result = match self.strategy {
            WriteStrategy::Replace => self.write_replace(encoded.as_bytes()),
            WriteStrategy::Overwrite => std::fs::write(&self.path, encoded.as_bytes()),
        };

        match result {
            Ok(()) => {
                info!(
                    "event=store_write module=repo status=ok strategy={:?} notes={} bytes={} duration_ms={}",
                    self.strategy,
                    document.notes.len(),
                    encoded.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_write module=repo status=error strategy={:?} duration_ms={} error={}",
                    self.strategy,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(self.write_error(err))
            }
        }
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
