#[path = "common/mod.rs"]
mod common;

use common::*;
use serde_json::{json, Value};
use std::path::Path;
use zst2db::{
    anonymous_id, assign_identifiers, check_distinct, epoch_seconds, full_id, parse_line, utc_date,
    ArchiveKind, ContentType, Identifiers, IngestError, Table,
};

/// Suffix detection is total: comments, submissions, or unrecognized.
#[test]
fn archive_kind_from_suffix() {
    assert_eq!(ArchiveKind::of(Path::new("foo_comments.zst")), ArchiveKind::Comments);
    assert_eq!(ArchiveKind::of(Path::new("data/raw/foo_submissions.zst")), ArchiveKind::Submissions);
    assert_eq!(ArchiveKind::of(Path::new("foo_other.zst")), ArchiveKind::Unrecognized);
    assert_eq!(ArchiveKind::of(Path::new("foo_comments.zst.bak")), ArchiveKind::Unrecognized);
    assert_eq!(ArchiveKind::of(Path::new("/")), ArchiveKind::Unrecognized);

    assert_eq!(ArchiveKind::Comments.content_type(), Some(ContentType::Comment));
    assert_eq!(ArchiveKind::Submissions.content_type(), Some(ContentType::Post));
    assert_eq!(ArchiveKind::Unrecognized.content_type(), None);
}

/// Projection keeps field order, drops extras, and fills absent keys with null.
#[test]
fn projection_follows_field_order() {
    let line = r#"{"score": 7, "id": "abc", "edited": true, "body": "hi", "created_utc": 1}"#;
    let rec = parse_line(line, ContentType::Comment).unwrap();

    let names: Vec<&str> = ContentType::Comment.fields().iter().map(|f| f.name).collect();
    assert_eq!(rec.values().len(), names.len());
    assert_eq!(rec.values()[0], json!("abc"));
    assert_eq!(rec.get(ContentType::Comment, "score"), Some(&json!(7)));
    assert_eq!(rec.get(ContentType::Comment, "body"), Some(&json!("hi")));
    assert_eq!(rec.get(ContentType::Comment, "permalink"), Some(&Value::Null));
    assert_eq!(rec.get(ContentType::Comment, "edited"), None, "extra keys are not columns");
}

#[test]
fn post_without_view_count_projects_null() {
    let rec = parse_line(&post("p1", MAY_FIRST), ContentType::Post).unwrap();
    assert_eq!(rec.get(ContentType::Post, "view_count"), Some(&Value::Null));
    assert_eq!(rec.get(ContentType::Post, "num_comments"), Some(&json!(4)));
}

#[test]
fn invalid_or_non_object_lines_are_rejected() {
    assert!(parse_line("{not json", ContentType::Comment).is_err());
    assert!(parse_line("", ContentType::Comment).is_err());
    assert!(parse_line("[1,2,3]", ContentType::Post).is_err());
    assert!(parse_line("\"id\"", ContentType::Post).is_err());
}

#[test]
fn anonymous_ids_pad_to_two_digits_without_truncating() {
    assert_eq!(anonymous_id('C', 1), "C01");
    assert_eq!(anonymous_id('P', 42), "P42");
    assert_eq!(anonymous_id('C', 100), "C100");
    assert_eq!(anonymous_id('P', 12345), "P12345");
}

#[test]
fn full_ids_use_thing_prefixes() {
    assert_eq!(full_id(ContentType::Comment, &json!("abc123")).as_deref(), Some("t1_abc123"));
    assert_eq!(full_id(ContentType::Post, &json!("xyz")).as_deref(), Some("t3_xyz"));
    assert_eq!(full_id(ContentType::Post, &json!(77)).as_deref(), Some("t3_77"));
    assert_eq!(full_id(ContentType::Comment, &Value::Null), None);
}

/// The 5th comment with id "abc123" becomes t1_abc123 / C05.
#[test]
fn fifth_comment_gets_c05() {
    let mut lines = comments(4);
    lines.push(comment("abc123", MAY_FIRST));
    lines.push(comment("d1", MAY_FIRST + 10));
    lines.push(comment("d2", MAY_FIRST + 11));
    let records: Vec<_> = lines
        .iter()
        .map(|l| parse_line(l, ContentType::Comment).unwrap())
        .collect();

    let ids = assign_identifiers(ContentType::Comment, &records).unwrap();
    assert_eq!(ids.len(), 7);
    assert_eq!(ids.full_ids[4].as_deref(), Some("t1_abc123"));
    assert_eq!(ids.unique_ids[4], "C05");
    let expected: Vec<String> = (1..=7).map(|i| format!("C{i:02}")).collect();
    assert_eq!(ids.unique_ids, expected);
}

/// A repeated anonymized id is rejected with the distinct and total counts.
#[test]
fn repeated_unique_ids_are_rejected() {
    let ids: Vec<String> = vec!["C01".into(), "C02".into(), "C01".into()];
    match check_distinct(ContentType::Comment, &ids) {
        Err(IngestError::DuplicateIdentifier { table, distinct, rows }) => {
            assert_eq!((table, distinct, rows), ("comments", 2, 3));
        }
        other => panic!("expected DuplicateIdentifier, got {other:?}"),
    }
    assert!(check_distinct(ContentType::Comment, &ids[..2]).is_ok());
    assert!(check_distinct(ContentType::Post, &[]).is_ok());
}

#[test]
fn empty_batch_gets_no_identifiers() {
    let ids = assign_identifiers(ContentType::Post, &[]).unwrap();
    assert!(ids.is_empty());
}

#[test]
fn dates_are_utc_calendar_days() {
    assert_eq!(utc_date(MAY_FIRST).as_deref(), Some("2023-05-01"));
    assert_eq!(utc_date(MAY_FIRST - 1).as_deref(), Some("2023-04-30"));
    assert_eq!(utc_date(0).as_deref(), Some("1970-01-01"));

    assert_eq!(epoch_seconds(&json!(MAY_FIRST)), Some(MAY_FIRST));
    assert_eq!(epoch_seconds(&json!("1682899200")), Some(MAY_FIRST));
    assert_eq!(epoch_seconds(&json!(1682899200.0)), Some(MAY_FIRST));
    assert_eq!(epoch_seconds(&json!("yesterday")), None);
    assert_eq!(epoch_seconds(&Value::Null), None);
}

/// Fractional timestamps round toward the earlier second, also before 1970.
#[test]
fn fractional_timestamps_are_floored() {
    assert_eq!(epoch_seconds(&json!(1682899200.9)), Some(MAY_FIRST));
    assert_eq!(epoch_seconds(&json!(-0.5)), Some(-1));
    assert_eq!(epoch_seconds(&json!("-0.5")), Some(-1));
    assert_eq!(epoch_seconds(&json!(-0.5)).and_then(utc_date).as_deref(), Some("1969-12-31"));
}

/// The table keeps every record in order and appends date, full_id, unique_id.
#[test]
fn materialized_table_layout() {
    let mut lines = posts(3);
    lines.push(r#"{"id": "p4", "created_utc": "1682899200"}"#.to_string());
    lines.push(r#"{"id": "p5"}"#.to_string());
    let records: Vec<_> = lines.iter().map(|l| parse_line(l, ContentType::Post).unwrap()).collect();
    let ids = assign_identifiers(ContentType::Post, &records).unwrap();
    let table = Table::materialize(ContentType::Post, records, ids).unwrap();

    assert_eq!(table.name(), "posts");
    assert_eq!(table.num_rows(), 5);
    let names: Vec<&str> = table.columns().iter().map(|c| c.name()).collect();
    assert_eq!(names.len(), ContentType::Post.fields().len() + 3);
    assert_eq!(&names[names.len() - 3..], &["date", "full_id", "unique_id"]);
    assert_eq!(names[0], "id");
    assert_eq!(names[17], "view_count");

    let date = &table.column("date").unwrap().cells;
    assert_eq!(date[0], json!("2023-05-01"));
    assert_eq!(date[3], json!("2023-05-01"));
    assert_eq!(date[4], Value::Null);

    let uid = &table.column("unique_id").unwrap().cells;
    assert_eq!(uid[0], json!("P01"));
    assert_eq!(uid[4], json!("P05"));
    assert_eq!(table.column("full_id").unwrap().cells[3], json!("t3_p4"));
    assert!(table.column("view_count").unwrap().cells.iter().all(Value::is_null));
}

/// Identifiers built for another batch are rejected instead of misaligning rows.
#[test]
fn materialize_rejects_mismatched_identifiers() {
    let records: Vec<_> = posts(3).iter().map(|l| parse_line(l, ContentType::Post).unwrap()).collect();
    let ids = assign_identifiers(ContentType::Post, &records[..2]).unwrap();
    match Table::materialize(ContentType::Post, records, ids) {
        Err(IngestError::IdentifierCount { table, identifiers, rows }) => {
            assert_eq!((table, identifiers, rows), ("posts", 2, 3));
        }
        other => panic!("expected IdentifierCount, got {other:?}"),
    }

    let records: Vec<_> = posts(1).iter().map(|l| parse_line(l, ContentType::Post).unwrap()).collect();
    let ids = Identifiers { full_ids: vec![], unique_ids: vec!["P01".into()] };
    assert!(matches!(
        Table::materialize(ContentType::Post, records, ids),
        Err(IngestError::IdentifierCount { .. })
    ));
}
