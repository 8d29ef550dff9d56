//! SQLite destination: table replacement and the `full_id` read contract.

use crate::error::{IngestError, Result};
use crate::schema::ContentType;
use crate::table::Table;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, OpenFlags};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

trait AtPath<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> AtPath<T> for rusqlite::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|e| IngestError::storage(path, e))
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Map a JSON cell onto SQLite storage classes.
/// Arrays and objects are stored as their JSON text.
pub fn to_sql_value(v: &Value) -> SqlValue {
    match v {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

/// An open destination store. The connection is closed when this is dropped.
pub struct SqliteSink {
    path: PathBuf,
    conn: Connection,
}

impl SqliteSink {
    /// Open the store at `path`, creating parent directories and an empty
    /// database file if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| IngestError::StorageIo { path: path.to_path_buf(), source: e })?;
        }
        let existed = path.exists();
        let conn = Connection::open(path).at(path)?;
        if !existed {
            info!("Created new SQLite database: {}", path.display());
            info!("SQLite version: {}", rusqlite::version());
        }
        Ok(Self { path: path.to_path_buf(), conn })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `table` under its content type's name, replacing any existing
    /// table of that name. Drop, create and inserts share one transaction, so
    /// a failure leaves the previous table untouched.
    pub fn replace_table(&mut self, table: &Table) -> Result<usize> {
        let path = self.path.clone();
        let name = quote_ident(table.name());
        let col_defs = table
            .columns()
            .iter()
            .map(|c| format!("{} {}", quote_ident(c.name()), c.field.sql_type.as_sql()))
            .collect::<Vec<_>>()
            .join(", ");
        let col_names = table
            .columns()
            .iter()
            .map(|c| quote_ident(c.name()))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=table.columns().len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");

        info!("Saving {} {}", table.num_rows(), table.name());
        let tx = self.conn.transaction().at(&path)?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {name};\nCREATE TABLE {name} ({col_defs});"
        ))
        .at(&path)?;
        {
            let mut stmt = tx
                .prepare(&format!("INSERT INTO {name} ({col_names}) VALUES ({placeholders})"))
                .at(&path)?;
            for i in 0..table.num_rows() {
                stmt.execute(params_from_iter(table.row(i).map(to_sql_value))).at(&path)?;
            }
        }
        tx.commit().at(&path)?;
        debug!("committed {} rows into {}", table.num_rows(), table.name());
        Ok(table.num_rows())
    }
}

/// Open `db_path`, replace the table, and release the connection on every path.
pub fn persist_table(db_path: &Path, table: &Table) -> Result<usize> {
    let mut sink = SqliteSink::open(db_path)?;
    sink.replace_table(table)
}

fn open_read_only(db_path: &Path) -> Result<Connection> {
    Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX)
        .at(db_path)
}

/// `SELECT full_id FROM comments|posts`, in row order. NULL ids are skipped.
pub fn read_full_ids(db_path: &Path, kind: ContentType) -> Result<Vec<String>> {
    let conn = open_read_only(db_path)?;
    let mut stmt = conn
        .prepare(&format!("SELECT full_id FROM {} ORDER BY rowid", quote_ident(kind.table_name())))
        .at(db_path)?;
    let rows = stmt
        .query_map([], |row| row.get::<_, Option<String>>(0))
        .at(db_path)?;
    let mut out = Vec::new();
    for r in rows {
        if let Some(id) = r.at(db_path)? {
            out.push(id);
        }
    }
    Ok(out)
}

/// Every `full_id` in the store: posts first, then comments.
pub fn read_all_full_ids(db_path: &Path) -> Result<Vec<String>> {
    let mut ids = read_full_ids(db_path, ContentType::Post)?;
    ids.extend(read_full_ids(db_path, ContentType::Comment)?);
    Ok(ids)
}

pub fn row_count(db_path: &Path, kind: ContentType) -> Result<usize> {
    let conn = open_read_only(db_path)?;
    let n: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {}", quote_ident(kind.table_name())), [], |r| r.get(0))
        .at(db_path)?;
    Ok(n as usize)
}
