//! In-memory columnar table for one content type.

use crate::date::date_cell;
use crate::error::{IngestError, Result};
use crate::identifiers::Identifiers;
use crate::record::ProjectedRecord;
use crate::schema::{ContentType, Field};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub field: Field,
    pub cells: Vec<Value>,
}

impl Column {
    pub fn name(&self) -> &'static str {
        self.field.name
    }
}

/// Projected fields in order, then `date`, `full_id`, `unique_id`.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    kind: ContentType,
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Assemble the batch column by column. Row count and order are those of
    /// `records`; nothing is filtered or deduplicated here.
    ///
    /// Fails with `IdentifierCount` if `ids` was built for a different batch.
    pub fn materialize(kind: ContentType, records: Vec<ProjectedRecord>, ids: Identifiers) -> Result<Self> {
        let rows = records.len();
        if ids.len() != rows || ids.full_ids.len() != rows {
            return Err(IngestError::IdentifierCount {
                table: kind.table_name(),
                identifiers: ids.len(),
                rows,
            });
        }

        let mut columns: Vec<Column> = kind
            .columns()
            .map(|field| Column { field, cells: Vec::with_capacity(rows) })
            .collect();
        let n_fields = kind.fields().len();
        let created_idx = kind
            .fields()
            .iter()
            .position(|f| f.name == "created_utc")
            .unwrap_or(0);

        for rec in records {
            let date = date_cell(&rec.values()[created_idx]);
            for (col, v) in columns.iter_mut().zip(rec.into_values()) {
                col.cells.push(v);
            }
            columns[n_fields].cells.push(date);
        }

        let Identifiers { full_ids, unique_ids } = ids;
        columns[n_fields + 1].cells = full_ids.into_iter().map(|f| f.map_or(Value::Null, Value::String)).collect();
        columns[n_fields + 2].cells = unique_ids.into_iter().map(Value::String).collect();

        Ok(Self { kind, columns, rows })
    }

    pub fn kind(&self) -> ContentType {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.table_name()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Row `i` as cells in column order.
    pub fn row(&self, i: usize) -> impl Iterator<Item = &Value> + '_ {
        self.columns.iter().map(move |c| &c.cells[i])
    }
}
