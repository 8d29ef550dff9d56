mod config;
mod date;
mod error;
mod identifiers;
mod mem;
mod paths;
mod pipeline;
mod progress;
mod record;
mod schema;
mod store;
mod table;
mod util;
mod zstd_jsonl;

pub use crate::config::{IngestOptions, DEFAULT_DB_PATH};
pub use crate::error::{IngestError, Result};
pub use crate::pipeline::{EntryReport, IngestSummary, Ingestor, RunReport};
pub use crate::schema::{ArchiveKind, ContentType, Field, SqlType, DERIVED_FIELDS};

// Stage-level building blocks, usable on their own.
pub use crate::zstd_jsonl::{ZstLines, WINDOW_LOG_MAX};
pub use crate::record::{parse_line, ProjectedRecord};
pub use crate::identifiers::{anonymous_id, assign_identifiers, check_distinct, full_id, Identifiers};
pub use crate::table::{Column, Table};
pub use crate::store::{persist_table, read_all_full_ids, read_full_ids, row_count, SqliteSink};
pub use crate::date::{epoch_seconds, utc_date};

// Discovery of the raw archives directory.
pub use crate::paths::discover_archives;

pub use crate::util::init_tracing_once;
pub use crate::mem::{available_memory_fraction, is_low_memory};
