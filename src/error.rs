//! Error taxonomy for one ingestion entry.
//!
//! Every variant is local to a single archive: the orchestrator records it in
//! the run report and moves on to the next archive.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    /// Filename does not end in `comments.zst` or `submissions.zst`.
    #[error("unknown archive kind: '{}' (expected a *comments.zst or *submissions.zst file)", path.display())]
    UnknownArchiveKind { path: PathBuf },

    /// A decompressed line is not a JSON object.
    #[error("malformed record at {}:{line}: {source}", path.display())]
    MalformedRecord {
        path: PathBuf,
        line: u64,
        #[source]
        source: serde_json::Error,
    },

    /// Anonymized identifiers collided before persistence.
    #[error("duplicate unique_id in {table}: {distinct} distinct values for {rows} rows")]
    DuplicateIdentifier {
        table: &'static str,
        distinct: usize,
        rows: usize,
    },

    /// Archive could not be opened or decompressed.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Destination store could not be opened, created or written.
    #[error("storage error on {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Destination store's directory could not be created.
    #[error("storage error on {}: {source}", path.display())]
    StorageIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Identifier columns do not line up with the records they annotate.
    #[error("{table}: {identifiers} identifiers for {rows} records")]
    IdentifierCount {
        table: &'static str,
        identifiers: usize,
        rows: usize,
    },

    /// Raw data directory is unreadable or holds ambiguous archives.
    #[error("archive discovery failed: {0}")]
    Discovery(String),
}

impl IngestError {
    pub(crate) fn decode(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Decode { path: path.into(), source }
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, source: rusqlite::Error) -> Self {
        Self::Storage { path: path.into(), source }
    }

    /// True for every failure to open, create or write the destination store.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::StorageIo { .. })
    }
}
