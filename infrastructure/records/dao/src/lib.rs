//! Record store gateway.
//!
//! All filtering the service needs is equality on `user_id`, an inclusive
//! range on `created_at`, and a `YYYY-%` prefix match for whole years.
//! `created_at` is a `"YYYY-MM-DD HH:MM:SS"` TEXT column, so range and
//! prefix predicates compare lexicographically.

use record_errors::RecordError;
use record_models::{Record, Tag};
use sql_connection::SqlConnect;
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct RecordDao {
    db: SqlConnect,
}

impl RecordDao {
    pub fn new(db: SqlConnect) -> Self { Self { db } }

    pub fn db(&self) -> &SqlConnect { &self.db }

    fn map_row(&self, row: &tokio_postgres::Row) -> Record {
        let tag: String = row.get(3);
        Record {
            id: row.get(0),
            user_id: row.get(1),
            content: row.get(2),
            tag: Tag::from(tag.as_str()),
            duration: row.get(4),
            created_at: row.get(5),
        }
    }

    #[instrument(skip(self, content))]
    pub async fn create(
        &self, user_id: &str, content: &str, tag: Tag, duration: i32,
        created_at: &str,
    ) -> Result<Record, RecordError> {
        let client = self.db.get_client().await?;

        let id = Uuid::now_v7();
        let stmt = client
            .prepare(
                "INSERT INTO records (id, user_id, content, tag, duration, \
                 created_at) VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .await?;
        client
            .execute(&stmt, &[
                &id,
                &user_id,
                &content,
                &tag.as_str(),
                &duration,
                &created_at,
            ])
            .await?;

        Ok(Record {
            id,
            user_id: user_id.to_string(),
            content: content.to_string(),
            tag,
            duration,
            created_at: created_at.to_string(),
        })
    }

    /// Inclusive `created_at` range scan for one user, newest first.
    #[instrument(skip(self))]
    pub async fn find_in_range(
        &self, user_id: &str, start: &str, end: &str,
    ) -> Result<Vec<Record>, RecordError> {
        let client = self.db.get_client().await?;

        let stmt = client
            .prepare(
                "SELECT id, user_id, content, tag, duration, created_at \
                 FROM records WHERE user_id = $1 AND created_at >= $2 AND \
                 created_at <= $3 ORDER BY created_at DESC",
            )
            .await?;
        let rows = client.query(&stmt, &[&user_id, &start, &end]).await?;

        Ok(rows.iter().map(|row| self.map_row(row)).collect())
    }

    /// All records of one calendar year, matched by `created_at` prefix.
    #[instrument(skip(self))]
    pub async fn find_by_year(
        &self, user_id: &str, year: &str,
    ) -> Result<Vec<Record>, RecordError> {
        let client = self.db.get_client().await?;

        let pattern = format!("{year}-%");
        let stmt = client
            .prepare(
                "SELECT id, user_id, content, tag, duration, created_at \
                 FROM records WHERE user_id = $1 AND created_at LIKE $2 \
                 ORDER BY created_at ASC",
            )
            .await?;
        let rows = client.query(&stmt, &[&user_id, &pattern]).await?;

        Ok(rows.iter().map(|row| self.map_row(row)).collect())
    }

    /// Delete is scoped to the owning user; deleting someone else's record
    /// reports not-found rather than touching it.
    #[instrument(skip(self))]
    pub async fn delete(
        &self, record_id: Uuid, user_id: &str,
    ) -> Result<(), RecordError> {
        let client = self.db.get_client().await?;

        let stmt = client
            .prepare("DELETE FROM records WHERE id = $1 AND user_id = $2")
            .await?;
        let affected = client.execute(&stmt, &[&record_id, &user_id]).await?;

        if affected == 0 {
            return Err(RecordError::NotFound { record_id });
        }
        Ok(())
    }
}
