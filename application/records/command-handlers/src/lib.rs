use chrono::Utc;
use record_commands::{
    BatchAddRecordsCommand, CreateRecordCommand, DeleteRecordCommand,
};
use record_dao::RecordDao;
use record_errors::RecordError;
use record_models::MAX_CONTENT_LEN;
use record_responses::{BatchAddResponse, FailedRecord, RecordResponse};
use sql_connection::SqlConnect;
use tracing::instrument;

const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Content must be non-empty and at most 50 characters, duration must not
/// be negative, and a client-supplied timestamp must keep the sortable
/// `YYYY-MM-DD HH:MM:SS` shape the record store relies on.
pub fn validate_record(cmd: &CreateRecordCommand) -> Result<(), RecordError> {
    if cmd.content.trim().is_empty() {
        return Err(RecordError::Validation(
            "content must not be empty".into(),
        ));
    }
    if cmd.content.chars().count() > MAX_CONTENT_LEN {
        return Err(RecordError::Validation(format!(
            "content must not exceed {MAX_CONTENT_LEN} characters"
        )));
    }
    if cmd.duration < 0 {
        return Err(RecordError::Validation(
            "duration must not be negative".into(),
        ));
    }
    if let Some(created_at) = &cmd.created_at {
        if chrono::NaiveDateTime::parse_from_str(created_at, CREATED_AT_FORMAT)
            .is_err()
        {
            return Err(RecordError::Validation(
                "created_at must be formatted as YYYY-MM-DD HH:MM:SS".into(),
            ));
        }
    }
    Ok(())
}

fn now_timestamp() -> String {
    Utc::now().format(CREATED_AT_FORMAT).to_string()
}

#[derive(Clone)]
pub struct CreateRecordHandler {
    record_dao: RecordDao,
}

impl CreateRecordHandler {
    pub fn new(db: SqlConnect) -> Self {
        Self {
            record_dao: RecordDao::new(db),
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: CreateRecordCommand,
    ) -> Result<RecordResponse, RecordError> {
        validate_record(&command)?;

        let created_at =
            command.created_at.clone().unwrap_or_else(now_timestamp);
        let record = self
            .record_dao
            .create(
                &command.user_id,
                command.content.trim(),
                command.tag,
                command.duration,
                &created_at,
            )
            .await?;

        Ok(record.into())
    }
}

#[derive(Clone)]
pub struct BatchAddRecordsHandler {
    record_dao: RecordDao,
}

impl BatchAddRecordsHandler {
    pub fn new(db: SqlConnect) -> Self {
        Self {
            record_dao: RecordDao::new(db),
        }
    }

    /// Offline-sync import: every row is attempted, failed rows are echoed
    /// back for the client to retry, and one bad row never aborts the rest.
    #[instrument(skip_all, fields(records = command.records.len()))]
    pub async fn execute(
        &self, command: BatchAddRecordsCommand,
    ) -> Result<BatchAddResponse, RecordError> {
        let mut success_count = 0;
        let mut failed = Vec::new();

        for mut record in command.records {
            record.user_id = command.user_id.clone();

            let result = match validate_record(&record) {
                Ok(()) => {
                    let created_at =
                        record.created_at.clone().unwrap_or_else(now_timestamp);
                    self.record_dao
                        .create(
                            &record.user_id,
                            record.content.trim(),
                            record.tag,
                            record.duration,
                            &created_at,
                        )
                        .await
                        .map(|_| ())
                }
                Err(err) => Err(err),
            };

            match result {
                Ok(()) => success_count += 1,
                Err(err) => failed.push(FailedRecord {
                    content: record.content,
                    tag: record.tag,
                    duration: record.duration,
                    created_at: record.created_at,
                    reason: err.to_string(),
                }),
            }
        }

        Ok(BatchAddResponse {
            success_count,
            failed,
        })
    }
}

#[derive(Clone)]
pub struct DeleteRecordHandler {
    record_dao: RecordDao,
}

impl DeleteRecordHandler {
    pub fn new(db: SqlConnect) -> Self {
        Self {
            record_dao: RecordDao::new(db),
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: DeleteRecordCommand,
    ) -> Result<(), RecordError> {
        self.record_dao
            .delete(command.record_id, &command.user_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use record_models::Tag;

    use super::*;

    fn command(content: &str, duration: i32) -> CreateRecordCommand {
        CreateRecordCommand {
            user_id: "u1".into(),
            content: content.into(),
            tag: Tag::Work,
            duration,
            created_at: None,
        }
    }

    #[test]
    fn accepts_a_plain_record() {
        assert!(validate_record(&command("standup", 15)).is_ok());
    }

    #[test]
    fn rejects_empty_content() {
        let err = validate_record(&command("   ", 15)).unwrap_err();
        assert!(matches!(err, RecordError::Validation(_)));
    }

    #[test]
    fn rejects_content_over_the_limit() {
        let long = "x".repeat(MAX_CONTENT_LEN + 1);
        assert!(validate_record(&command(&long, 15)).is_err());

        let at_limit = "x".repeat(MAX_CONTENT_LEN);
        assert!(validate_record(&command(&at_limit, 15)).is_ok());
    }

    #[test]
    fn rejects_negative_duration() {
        assert!(validate_record(&command("standup", -1)).is_err());
        assert!(validate_record(&command("standup", 0)).is_ok());
    }

    #[test]
    fn rejects_unsortable_created_at() {
        let mut cmd = command("standup", 15);
        cmd.created_at = Some("21/02/2026 10:00".into());
        assert!(validate_record(&cmd).is_err());

        cmd.created_at = Some("2026-02-21 10:00:00".into());
        assert!(validate_record(&cmd).is_ok());
    }
}
