use crate::config::IngestOptions;
use crate::error::{IngestError, Result};
use crate::identifiers::assign_identifiers;
use crate::mem::BatchMemoryWatch;
use crate::progress::DecodeProgress;
use crate::record::{parse_line, ProjectedRecord};
use crate::schema::{ArchiveKind, ContentType};
use crate::store::persist_table;
use crate::table::Table;
use crate::util::{display_path, init_tracing_once};
use crate::zstd_jsonl::{compressed_len, ZstLines};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Drives archives through decode → parse → identifiers → table → store.
#[derive(Clone, Debug, Default)]
pub struct Ingestor {
    pub(crate) opts: IngestOptions,
}

/// What one successful archive ingestion produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub archive: PathBuf,
    pub table: &'static str,
    pub rows: usize,
    #[serde(skip)]
    pub kind: ContentType,
}

/// Outcome of one configured `label -> archive` entry.
#[derive(Debug)]
pub struct EntryReport {
    pub label: String,
    pub archive: PathBuf,
    pub outcome: Result<IngestSummary>,
}

/// Per-entry outcomes of a run. Entries are independent: a failure in one
/// does not roll back or skip the others.
#[derive(Debug, Default)]
pub struct RunReport {
    pub entries: Vec<EntryReport>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.entries.iter().all(|e| e.outcome.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &EntryReport> {
        self.entries.iter().filter(|e| e.outcome.is_err())
    }

    pub fn summaries(&self) -> impl Iterator<Item = &IngestSummary> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().ok())
    }
}

impl Ingestor {
    pub fn new() -> Self {
        Self { opts: IngestOptions::default() }
    }

    pub fn with_options(opts: IngestOptions) -> Self {
        Self { opts }
    }

    // -------- Builder methods --------
    pub fn db_path(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_db_path(path); self }
    pub fn archive(mut self, label: impl Into<String>, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_archive(label, path); self }
    pub fn archives<I, L, P>(mut self, entries: I) -> Self where I: IntoIterator<Item = (L, P)>, L: Into<String>, P: AsRef<Path> { self.opts = self.opts.with_archives(entries); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }
    pub fn low_memory_threshold(mut self, frac: f64) -> Self { self.opts = self.opts.with_low_memory_threshold(frac); self }

    pub fn options(&self) -> &IngestOptions {
        &self.opts
    }

    /// Ingest every configured archive in order and report each outcome.
    pub fn run(&self) -> RunReport {
        init_tracing_once();
        let mut report = RunReport::default();
        for (label, path) in &self.opts.archives {
            let outcome = self.ingest_archive(path);
            match &outcome {
                Ok(s) => {
                    if s.table != label.as_str() {
                        warn!("entry '{}' was ingested into table '{}'", label, s.table);
                    }
                }
                Err(e) => error!("{} ({}): {}", label, path.display(), e),
            }
            report.entries.push(EntryReport { label: label.clone(), archive: path.clone(), outcome });
        }
        report
    }

    /// Ingest one archive into the store, replacing its table.
    /// Nothing is written unless every line parses and identifiers check out.
    pub fn ingest_archive(&self, path: &Path) -> Result<IngestSummary> {
        init_tracing_once();
        let kind = ArchiveKind::of(path)
            .content_type()
            .ok_or_else(|| IngestError::UnknownArchiveKind { path: path.to_path_buf() })?;

        let table = self.load_table(path, kind)?;
        let rows = persist_table(&self.opts.db_path, &table)?;
        info!("Done! {} {} in {}", rows, table.name(), display_path(&self.opts.db_path).display());

        Ok(IngestSummary { archive: path.to_path_buf(), table: kind.table_name(), rows, kind })
    }

    /// Decode, parse and annotate one archive without touching the store.
    pub fn load_table(&self, path: &Path, kind: ContentType) -> Result<Table> {
        info!("Iterating over {}", display_path(path).display());
        let mut lines = ZstLines::open_with_capacity(path, self.opts.read_buffer_bytes)?;
        let mut progress = DecodeProgress::new(self.opts.progress, compressed_len(path), kind.table_name());

        let records = match self.collect_records(&mut lines, kind, &mut progress) {
            Ok(r) => {
                progress.finish(r.len());
                r
            }
            Err(e) => {
                progress.abandon();
                return Err(e);
            }
        };
        drop(lines);

        info!("Porting {} new-line JSON {} to a table", records.len(), kind);
        let ids = assign_identifiers(kind, &records)?;
        Table::materialize(kind, records, ids)
    }

    fn collect_records(
        &self,
        lines: &mut ZstLines,
        kind: ContentType,
        progress: &mut DecodeProgress,
    ) -> Result<Vec<ProjectedRecord>> {
        let mut watch = BatchMemoryWatch::new(self.opts.low_memory_threshold);
        let mut records = Vec::new();
        let mut line_no = 0u64;
        while let Some(line) = lines.next() {
            let line = line?;
            line_no += 1;
            let rec = parse_line(&line, kind).map_err(|source| IngestError::MalformedRecord {
                path: lines.path().to_path_buf(),
                line: line_no,
                source,
            })?;
            records.push(rec);
            progress.update(lines.compressed_bytes_read());
            watch.observe(records.len(), kind.table_name());
        }
        Ok(records)
    }
}
