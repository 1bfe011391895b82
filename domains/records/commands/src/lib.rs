use record_models::Tag;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRecordCommand {
    #[serde(skip)]
    pub user_id: String,
    pub content: String,
    /// Unknown tags coerce to `other` during deserialization.
    pub tag: Tag,
    #[serde(default)]
    pub duration: i32,
    /// Client-supplied timestamp (offline sync); the handler fills in the
    /// current UTC time when absent.
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchAddRecordsCommand {
    #[serde(skip)]
    pub user_id: String,
    pub records: Vec<CreateRecordCommand>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteRecordCommand {
    pub record_id: Uuid,
    pub user_id: String,
}
