use crate::error::{IngestError, Result};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use zstd::stream::read::Decoder;

/// Pushshift dumps are written as one frame with a window far beyond zstd's
/// default decoder limit (2^27). 2^31 covers every published dump.
pub const WINDOW_LOG_MAX: u32 = 31;

const DEFAULT_READ_BUF: usize = 256 * 1024;

/// A `Read` wrapper that counts compressed bytes read.
struct CountingReader<R: Read> {
    inner: R,
    counter: Arc<AtomicU64>,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

type LineReader = BufReader<Decoder<'static, BufReader<CountingReader<File>>>>;

/// Lazy, forward-only sequence of the decompressed lines of one `.zst` file.
///
/// The file stays open only while the sequence is live: it is closed as soon
/// as EOF or an error is reached, or when the value is dropped. After an
/// error the sequence yields `None`. To read again, open a new `ZstLines`.
pub struct ZstLines {
    path: PathBuf,
    reader: Option<LineReader>,
    counter: Arc<AtomicU64>,
    buf: String,
}

impl ZstLines {
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_capacity(path, DEFAULT_READ_BUF)
    }

    /// Same as `open` with a custom `BufReader` capacity for the decoded side.
    pub fn open_with_capacity(path: &Path, read_buf_bytes: usize) -> Result<Self> {
        let file = File::open(path).map_err(|e| IngestError::decode(path, e))?;
        let counter = Arc::new(AtomicU64::new(0));
        let counting = CountingReader { inner: file, counter: counter.clone() };

        let mut decoder = Decoder::new(counting).map_err(|e| IngestError::decode(path, e))?;
        decoder
            .window_log_max(WINDOW_LOG_MAX)
            .map_err(|e| IngestError::decode(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            reader: Some(BufReader::with_capacity(read_buf_bytes.max(8 * 1024), decoder)),
            counter,
            buf: String::with_capacity(16 * 1024),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Compressed bytes pulled from the file so far.
    pub fn compressed_bytes_read(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    /// True once the underlying file has been released.
    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }
}

impl Iterator for ZstLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        self.buf.clear();
        match reader.read_line(&mut self.buf) {
            Ok(0) => {
                self.reader = None;
                None
            }
            Ok(_) => {
                if self.buf.ends_with('\n') {
                    self.buf.pop();
                    if self.buf.ends_with('\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(self.buf.clone()))
            }
            Err(e) => {
                self.reader = None;
                Some(Err(IngestError::decode(&self.path, e)))
            }
        }
    }
}

impl std::iter::FusedIterator for ZstLines {}

/// Compressed size of an archive, for byte-based progress. 0 if unknown.
pub fn compressed_len(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
