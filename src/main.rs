use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use zst2db::{discover_archives, init_tracing_once, Ingestor, DEFAULT_DB_PATH};

const RAW_ROOT: &str = "./data/raw";

/// zst2db [raw_dir] [db_path]
/// Falls back to ZST2DB_RAW_DIR / ZST2DB_DB_PATH, then to the defaults.
fn main() -> Result<()> {
    init_tracing_once();

    let mut args = std::env::args_os().skip(1);
    let raw_dir = args
        .next()
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("ZST2DB_RAW_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(RAW_ROOT));
    let db_path = args
        .next()
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("ZST2DB_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

    let archives = discover_archives(&raw_dir)
        .with_context(|| format!("discovering archives in {}", raw_dir.display()))?;
    if archives.is_empty() {
        bail!("no *comments.zst or *submissions.zst archives in {}", raw_dir.display());
    }

    let report = Ingestor::new()
        .db_path(&db_path)
        .archives(archives)
        .progress(true)
        .run();

    for s in report.summaries() {
        println!("{}", serde_json::to_string(s)?);
    }

    let failed: Vec<_> = report.failures().map(|e| e.label.as_str()).collect();
    if !failed.is_empty() {
        bail!("{} of {} archives failed: {}", failed.len(), report.entries.len(), failed.join(", "));
    }
    Ok(())
}
