use std::path::{Path, PathBuf};

/// Where the store lives when nothing else is configured.
pub const DEFAULT_DB_PATH: &str = "data/sqlite/idw_reddit.db";

/// User-facing options with defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct IngestOptions {
    pub db_path: PathBuf,
    /// Ordered `label -> archive` entries; each label appears once.
    pub archives: Vec<(String, PathBuf)>,
    pub progress: bool,               // show a progress bar per archive
    pub read_buffer_bytes: usize,     // BufReader capacity on the decompressed side
    pub low_memory_threshold: f64,    // warn when available/total RAM drops below this
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            archives: Vec::new(),
            progress: true,
            read_buffer_bytes: 256 * 1024,
            low_memory_threshold: 0.10,
        }
    }
}

impl IngestOptions {
    pub fn with_db_path(mut self, path: impl AsRef<Path>) -> Self {
        self.db_path = path.as_ref().to_path_buf();
        self
    }

    /// Add or replace the archive for `label`.
    pub fn with_archive(mut self, label: impl Into<String>, path: impl AsRef<Path>) -> Self {
        let label = label.into();
        let path = path.as_ref().to_path_buf();
        match self.archives.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = path,
            None => self.archives.push((label, path)),
        }
        self
    }

    pub fn with_archives<I, L, P>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (L, P)>,
        L: Into<String>,
        P: AsRef<Path>,
    {
        entries
            .into_iter()
            .fold(self, |opts, (label, path)| opts.with_archive(label, path))
    }

    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }

    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }

    /// 0.0 disables the warning.
    pub fn with_low_memory_threshold(mut self, frac: f64) -> Self {
        self.low_memory_threshold = frac.clamp(0.0, 1.0);
        self
    }
}
