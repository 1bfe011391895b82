//! Fixture builders shared by unit tests across the workspace.

use record_models::{Record, Tag};
use uuid::Uuid;

pub const TEST_USER: &str = "test-user";

/// A record for [`TEST_USER`] with a fresh id.
pub fn record(tag: Tag, duration: i32, created_at: &str) -> Record {
    record_for(TEST_USER, tag, duration, created_at)
}

pub fn record_for(
    user_id: &str, tag: Tag, duration: i32, created_at: &str,
) -> Record {
    Record {
        id: Uuid::now_v7(),
        user_id: user_id.to_string(),
        content: format!("{tag} session"),
        tag,
        duration,
        created_at: created_at.to_string(),
    }
}
