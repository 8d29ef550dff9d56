#![allow(dead_code)]

use rusqlite::Connection;
use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 2023-05-01T00:00:00Z
pub const MAY_FIRST: i64 = 1682899200;

/// Write a compressed `.zst` file containing the provided JSONL lines.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Same as `write_zst_lines` but requests a large window, like the real dumps.
pub fn write_zst_lines_long_window(path: &Path, lines: &[String], window_log: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    enc.window_log(window_log).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// A comment line with a few fields that are not part of the projection.
pub fn comment(id: &str, created_utc: i64) -> String {
    json!({
        "id": id, "link_id": "t3_s1", "parent_id": "t3_s1",
        "permalink": format!("/r/IntellectualDarkWeb/comments/s1/x/{id}/"),
        "subreddit": "IntellectualDarkWeb", "subreddit_id": "t5_idw",
        "created_utc": created_utc, "retrieved_utc": created_utc + 60,
        "author": format!("user_{id}"), "distinguished": null,
        "body": format!("comment {id}"), "score": 3, "score_hidden": false,
        "total_awards_received": 0,
        "controversiality": 0, "gilded": 0, "edited": false
    })
    .to_string()
}

/// A submission line; `view_count` is deliberately absent.
pub fn post(id: &str, created_utc: i64) -> String {
    json!({
        "id": id, "permalink": format!("/r/IntellectualDarkWeb/comments/{id}/title/"),
        "url": "https://example.com/a", "domain": "example.com",
        "created_utc": created_utc, "retrieved_utc": created_utc + 60,
        "subreddit": "IntellectualDarkWeb", "subreddit_id": "t5_idw",
        "author": format!("poster_{id}"), "distinguished": null,
        "title": format!("title {id}"), "selftext": "", "score": 10,
        "stickied": false, "total_awards_received": 1,
        "num_comments": 4, "num_crossposts": 0,
        "is_self": false, "over_18": false
    })
    .to_string()
}

pub fn comments(n: usize) -> Vec<String> {
    (1..=n).map(|i| comment(&format!("c{i}"), MAY_FIRST + i as i64)).collect()
}

pub fn posts(n: usize) -> Vec<String> {
    (1..=n).map(|i| post(&format!("p{i}"), MAY_FIRST + i as i64)).collect()
}

/// Fresh temp directory with `raw/` and `sqlite/` layout; returns (base, db path).
pub fn workspace() -> (PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.into_path();
    let db = base.join("sqlite").join("test.db");
    (base, db)
}

/// Column names of `table`, in declaration order.
pub fn table_columns(db: &Path, table: &str) -> Vec<String> {
    let conn = Connection::open(db).unwrap();
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})")).unwrap();
    let rows = stmt.query_map([], |r| r.get::<_, String>(1)).unwrap();
    rows.map(|r| r.unwrap()).collect()
}

/// One text column of `table` in row order (NULL as None).
pub fn text_column(db: &Path, table: &str, column: &str) -> Vec<Option<String>> {
    let conn = Connection::open(db).unwrap();
    let mut stmt = conn
        .prepare(&format!("SELECT {column} FROM {table} ORDER BY rowid"))
        .unwrap();
    let rows = stmt.query_map([], |r| r.get::<_, Option<String>>(0)).unwrap();
    rows.map(|r| r.unwrap()).collect()
}

/// Every row of `table` rendered as JSON values, for whole-table comparisons.
pub fn dump_table(db: &Path, table: &str) -> Vec<Vec<Value>> {
    let conn = Connection::open(db).unwrap();
    let mut stmt = conn.prepare(&format!("SELECT * FROM {table} ORDER BY rowid")).unwrap();
    let n = stmt.column_count();
    let rows = stmt
        .query_map([], |r| {
            let mut row = Vec::with_capacity(n);
            for i in 0..n {
                let v: rusqlite::types::Value = r.get(i)?;
                row.push(match v {
                    rusqlite::types::Value::Null => Value::Null,
                    rusqlite::types::Value::Integer(i) => json!(i),
                    rusqlite::types::Value::Real(f) => json!(f),
                    rusqlite::types::Value::Text(s) => json!(s),
                    rusqlite::types::Value::Blob(b) => json!(b),
                });
            }
            Ok(row)
        })
        .unwrap();
    rows.map(|r| r.unwrap()).collect()
}

pub fn table_exists(db: &Path, table: &str) -> bool {
    let conn = Connection::open(db).unwrap();
    let n: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |r| r.get(0),
        )
        .unwrap();
    n == 1
}
