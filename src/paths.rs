use crate::error::{IngestError, Result};
use crate::schema::ArchiveKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Scan `raw_dir` (top level only) for `*comments.zst` / `*submissions.zst`
/// and return `(table label, path)` entries, comments before posts.
///
/// Two archives of the same kind make the mapping ambiguous and are an error.
pub fn discover_archives(raw_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !raw_dir.is_dir() {
        return Err(IngestError::Discovery(format!("{} is not a directory", raw_dir.display())));
    }

    let mut found: Vec<(String, PathBuf)> = Vec::new();
    for entry in WalkDir::new(raw_dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let ent = entry.map_err(|e| IngestError::Discovery(e.to_string()))?;
        if !ent.file_type().is_file() {
            continue;
        }
        let kind = match ArchiveKind::of(ent.path()).content_type() {
            Some(k) => k,
            None => {
                tracing::debug!("ignoring {}", ent.path().display());
                continue;
            }
        };
        let label = kind.table_name();
        if let Some((_, prev)) = found.iter().find(|(l, _)| l == label) {
            return Err(IngestError::Discovery(format!(
                "more than one {} archive: {} and {}",
                label,
                prev.display(),
                ent.path().display()
            )));
        }
        found.push((label.to_string(), ent.path().to_path_buf()));
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    if found.is_empty() {
        tracing::warn!("No archives found in {}", raw_dir.display());
    }
    Ok(found)
}
