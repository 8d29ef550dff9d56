//! Batch-wide identifier derivation: `full_id` and the anonymized `unique_id`.

use crate::error::{IngestError, Result};
use crate::record::ProjectedRecord;
use crate::schema::ContentType;
use ahash::AHashSet;
use serde_json::Value;

/// Identifier columns for one batch, index-aligned with the records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Identifiers {
    pub full_ids: Vec<Option<String>>,
    pub unique_ids: Vec<String>,
}

impl Identifiers {
    pub fn len(&self) -> usize {
        self.unique_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unique_ids.is_empty()
    }
}

/// `prefix` followed by `n`, zero-padded to at least two digits (`C05`, `C100`).
pub fn anonymous_id(prefix: char, n: usize) -> String {
    format!("{prefix}{n:02}")
}

/// `t1_abc` / `t3_abc`. Numeric ids keep their decimal form; missing ids give `None`.
pub fn full_id(kind: ContentType, id: &Value) -> Option<String> {
    let raw = match id {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Some(format!("{}{}", kind.fullname_prefix(), raw))
}

/// Assign identifiers over the whole ordered batch (counter starts at 1).
///
/// Fails with `DuplicateIdentifier` if the anonymized ids are not all distinct.
pub fn assign_identifiers(kind: ContentType, records: &[ProjectedRecord]) -> Result<Identifiers> {
    let prefix = kind.anon_prefix();
    let mut ids = Identifiers {
        full_ids: Vec::with_capacity(records.len()),
        unique_ids: Vec::with_capacity(records.len()),
    };

    let mut missing = 0usize;
    for (i, rec) in records.iter().enumerate() {
        let fid = full_id(kind, rec.id());
        if fid.is_none() {
            missing += 1;
        }
        ids.full_ids.push(fid);
        ids.unique_ids.push(anonymous_id(prefix, i + 1));
    }
    if missing > 0 {
        tracing::warn!("{} {} without an id; their full_id is NULL", missing, kind);
    }

    check_distinct(kind, &ids.unique_ids)?;
    Ok(ids)
}

/// Every anonymized id in the batch must be distinct.
pub fn check_distinct(kind: ContentType, unique_ids: &[String]) -> Result<()> {
    let distinct: AHashSet<&str> = unique_ids.iter().map(String::as_str).collect();
    if distinct.len() != unique_ids.len() {
        return Err(IngestError::DuplicateIdentifier {
            table: kind.table_name(),
            distinct: distinct.len(),
            rows: unique_ids.len(),
        });
    }
    Ok(())
}
