use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Upper bound on `Record::content`, enforced at command validation.
pub const MAX_CONTENT_LEN: usize = 50;

/// Activity category. Anything outside the enumerated set coerces to
/// [`Tag::Other`], both on deserialization and on explicit conversion.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum Tag {
    Work,
    Study,
    Leisure,
    Chores,
    Other,
}

impl Tag {
    pub const ALL: [Tag; 5] =
        [Tag::Work, Tag::Study, Tag::Leisure, Tag::Chores, Tag::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Work => "work",
            Tag::Study => "study",
            Tag::Leisure => "leisure",
            Tag::Chores => "chores",
            Tag::Other => "other",
        }
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        match value {
            "work" => Tag::Work,
            "study" => Tag::Study,
            "leisure" => Tag::Leisure,
            "chores" => Tag::Chores,
            _ => Tag::Other,
        }
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self { Tag::from(value.as_str()) }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single logged activity.
///
/// `created_at` is kept as a `"YYYY-MM-DD HH:MM:SS"` string; the record
/// store compares and filters it lexicographically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,
    pub user_id: String,
    pub content: String,
    pub tag: Tag,
    /// Minutes spent, never negative.
    pub duration: i32,
    pub created_at: String,
}

impl Record {
    /// Month component of `created_at` (1..=12), `None` when the string is
    /// too short or does not parse. Aggregations skip the month bucket for
    /// such records while still counting their tag totals.
    pub fn month(&self) -> Option<u32> {
        self.created_at
            .get(5..7)?
            .parse::<u32>()
            .ok()
            .filter(|month| (1..=12).contains(month))
    }
}
