//! The two fixed record shapes and archive-kind detection.

use std::fmt;
use std::path::Path;

/// Declared SQLite column type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Text,
}

impl SqlType {
    pub fn as_sql(self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Text => "TEXT",
        }
    }
}

/// One projected column: JSON key (== column name) and its declared type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub sql_type: SqlType,
}

const fn int(name: &'static str) -> Field { Field { name, sql_type: SqlType::Integer } }
const fn text(name: &'static str) -> Field { Field { name, sql_type: SqlType::Text } }

const COMMENT_FIELDS: &[Field] = &[
    text("id"),
    text("link_id"),
    text("parent_id"),
    text("permalink"),
    text("subreddit"),
    text("subreddit_id"),
    int("created_utc"),
    int("retrieved_utc"),
    text("author"),
    text("distinguished"),
    text("body"),
    int("score"),
    int("score_hidden"),
    int("total_awards_received"),
];

const POST_FIELDS: &[Field] = &[
    text("id"),
    text("permalink"),
    text("url"),
    text("domain"),
    int("created_utc"),
    int("retrieved_utc"),
    text("subreddit"),
    text("subreddit_id"),
    text("author"),
    text("distinguished"),
    text("title"),
    text("selftext"),
    int("score"),
    int("stickied"),
    int("total_awards_received"),
    int("num_comments"),
    int("num_crossposts"),
    int("view_count"),
];

/// Columns appended after the projected fields, in this order.
pub const DERIVED_FIELDS: &[Field] = &[text("date"), text("full_id"), text("unique_id")];

/// Record shape carried by an archive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentType {
    Comment,
    Post,
}

impl ContentType {
    /// Projected fields in table order.
    pub fn fields(self) -> &'static [Field] {
        match self {
            ContentType::Comment => COMMENT_FIELDS,
            ContentType::Post => POST_FIELDS,
        }
    }

    /// Destination table name.
    pub fn table_name(self) -> &'static str {
        match self {
            ContentType::Comment => "comments",
            ContentType::Post => "posts",
        }
    }

    /// Reddit "thing" prefix used to build `full_id`.
    pub fn fullname_prefix(self) -> &'static str {
        match self {
            ContentType::Comment => "t1_",
            ContentType::Post => "t3_",
        }
    }

    /// Single-letter prefix of the anonymized `unique_id`.
    pub fn anon_prefix(self) -> char {
        match self {
            ContentType::Comment => 'C',
            ContentType::Post => 'P',
        }
    }

    /// Every column of the persisted table: projected fields then derived ones.
    pub fn columns(self) -> impl Iterator<Item = Field> {
        self.fields().iter().chain(DERIVED_FIELDS.iter()).copied()
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// What a path's filename says about its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveKind {
    Comments,
    Submissions,
    Unrecognized,
}

impl ArchiveKind {
    /// Total classification of a path by filename suffix.
    pub fn of(path: &Path) -> Self {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => return ArchiveKind::Unrecognized,
        };
        match name {
            n if n.ends_with("comments.zst") => ArchiveKind::Comments,
            n if n.ends_with("submissions.zst") => ArchiveKind::Submissions,
            _ => ArchiveKind::Unrecognized,
        }
    }

    pub fn content_type(self) -> Option<ContentType> {
        match self {
            ArchiveKind::Comments => Some(ContentType::Comment),
            ArchiveKind::Submissions => Some(ContentType::Post),
            ArchiveKind::Unrecognized => None,
        }
    }
}
