//! Wire shapes consumed by clients. Field names here are the contract;
//! the statistics shapes are also what the cache stores and replays.

use record_models::{Record, Tag};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecordResponse {
    pub id: Uuid,
    pub user_id: String,
    pub content: String,
    pub tag: Tag,
    pub duration: i32,
    pub created_at: String,
}

impl From<Record> for RecordResponse {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            content: record.content,
            tag: record.tag,
            duration: record.duration,
            created_at: record.created_at,
        }
    }
}

/// One row a failed batch insert echoes back so the client can retry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FailedRecord {
    pub content: String,
    pub tag: Tag,
    pub duration: i32,
    pub created_at: Option<String>,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchAddResponse {
    pub success_count: u32,
    pub failed: Vec<FailedRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeekTagStat {
    pub tag: Tag,
    pub count: u32,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct YearTagStat {
    pub tag: Tag,
    pub count: u32,
    pub total_hours: f64,
    /// Share of the year's total hours, in percent.
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthHours {
    pub month: u32,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct YearStats {
    pub tag_stats: Vec<YearTagStat>,
    /// Always 12 entries, January first, zero-filled months included.
    pub month_hours: Vec<MonthHours>,
    pub max_month: u32,
    pub max_hours: f64,
    pub min_month: u32,
    pub min_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct YearlyTagStat {
    pub tag: Tag,
    pub count: u32,
    pub duration: i64,
    /// Share of the year's total duration, as a raw fraction.
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyTrend {
    pub month: u32,
    pub count: u32,
    pub duration: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct YearlySummary {
    pub total_records: u32,
    pub total_duration: i64,
    pub tag_stats: Vec<YearlyTagStat>,
    /// Always 12 entries, January first.
    pub monthly_trend: Vec<MonthlyTrend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyTagStat {
    pub tag: Tag,
    pub count: u32,
    pub duration: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlySummary {
    pub daily_average: f64,
    pub tag_stats: Vec<MonthlyTagStat>,
}
