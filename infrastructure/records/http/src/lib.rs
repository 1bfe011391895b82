use std::sync::Arc;

use auth::{AuthClaims, JwtDecoder};
use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use common_errors::AppError;
use record_command_handlers::{
    BatchAddRecordsHandler, CreateRecordHandler, DeleteRecordHandler,
};
use record_commands::{
    BatchAddRecordsCommand, CreateRecordCommand, DeleteRecordCommand,
};
use record_queries::{
    DateRecordsQuery, ExportWeekQuery, ExportYearQuery, MonthlyStatsQuery,
    TodayRecordsQuery, WeekStatsQuery, YearStatsQuery, YearlyStatsQuery,
};
use record_query_handlers::{
    DateRecordsQueryHandler, ExportWeekQueryHandler, ExportYearQueryHandler,
    MonthlyStatsQueryHandler, TodayRecordsQueryHandler,
    WeekStatsQueryHandler, YearStatsQueryHandler, YearlyStatsQueryHandler,
};
use record_responses::{
    BatchAddResponse, MonthlySummary, RecordResponse, WeekTagStat, YearStats,
    YearlySummary,
};
use serde::Deserialize;
use sql_connection::SqlConnect;
use stats_cache::StatsCache;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Clone)]
pub struct RecordServices {
    pub create_record: CreateRecordHandler,
    pub batch_add_records: BatchAddRecordsHandler,
    pub delete_record: DeleteRecordHandler,

    pub today_records: TodayRecordsQueryHandler,
    pub date_records: DateRecordsQueryHandler,
    pub week_stats: WeekStatsQueryHandler,
    pub year_stats: YearStatsQueryHandler,
    pub yearly_stats: YearlyStatsQueryHandler,
    pub monthly_stats: MonthlyStatsQueryHandler,
    pub export_week: ExportWeekQueryHandler,
    pub export_year: ExportYearQueryHandler,

    jwt: JwtDecoder,
}

impl RecordServices {
    /// All statistics handlers share the one injected cache instance.
    pub fn new(
        db: SqlConnect, cache: Arc<StatsCache>, jwt: JwtDecoder,
    ) -> Self {
        Self {
            create_record: CreateRecordHandler::new(db.clone()),
            batch_add_records: BatchAddRecordsHandler::new(db.clone()),
            delete_record: DeleteRecordHandler::new(db.clone()),
            today_records: TodayRecordsQueryHandler::new(db.clone()),
            date_records: DateRecordsQueryHandler::new(db.clone()),
            week_stats: WeekStatsQueryHandler::new(
                db.clone(),
                Arc::clone(&cache),
            ),
            year_stats: YearStatsQueryHandler::new(
                db.clone(),
                Arc::clone(&cache),
            ),
            yearly_stats: YearlyStatsQueryHandler::new(
                db.clone(),
                Arc::clone(&cache),
            ),
            monthly_stats: MonthlyStatsQueryHandler::new(
                db.clone(),
                Arc::clone(&cache),
            ),
            export_week: ExportWeekQueryHandler::new(db.clone()),
            export_year: ExportYearQueryHandler::new(db),
            jwt,
        }
    }
}

impl FromRef<RecordServices> for JwtDecoder {
    fn from_ref(services: &RecordServices) -> Self { services.jwt.clone() }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct DateParam {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct WeekRangeParams {
    pub week_start: Option<String>,
    pub week_end: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct YearParam {
    pub year: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct MonthParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

fn week_range(
    params: WeekRangeParams,
) -> Result<(String, String), AppError> {
    match (params.week_start, params.week_end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => {
            Err(AppError::bad_request(
                "MISSING_PARAMS",
                "week_start and week_end are required",
            ))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/records/add",
    request_body = CreateRecordCommand,
    responses(
        (status = 201, description = "Record created", body = RecordResponse),
        (status = 400, description = "Validation failed", body = common_errors::ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "records"
)]
#[instrument(skip_all)]
pub async fn add_record(
    State(services): State<RecordServices>, claims: AuthClaims,
    Json(mut command): Json<CreateRecordCommand>,
) -> Result<(StatusCode, Json<RecordResponse>), AppError> {
    command.user_id = claims.user_id;
    let record = services.create_record.execute(command).await?;

    tracing::info!("record created: {}", record.id);

    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    post,
    path = "/api/records/batch-add",
    request_body = BatchAddRecordsCommand,
    responses(
        (status = 200, description = "Batch processed, failures echoed back", body = BatchAddResponse),
        (status = 401, description = "Missing or invalid token", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "records"
)]
#[instrument(skip_all)]
pub async fn batch_add_records(
    State(services): State<RecordServices>, claims: AuthClaims,
    Json(mut command): Json<BatchAddRecordsCommand>,
) -> Result<Json<BatchAddResponse>, AppError> {
    command.user_id = claims.user_id;
    let result = services.batch_add_records.execute(command).await?;

    tracing::info!(
        "batch add finished: {} ok, {} failed",
        result.success_count,
        result.failed.len()
    );

    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/records/today",
    responses(
        (status = 200, description = "Today's records, newest first", body = Vec<RecordResponse>),
        (status = 401, description = "Missing or invalid token", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "records"
)]
#[instrument(skip_all)]
pub async fn today_records(
    State(services): State<RecordServices>, claims: AuthClaims,
) -> Result<Json<Vec<RecordResponse>>, AppError> {
    let query = TodayRecordsQuery {
        user_id: claims.user_id,
    };
    Ok(Json(services.today_records.execute(query).await?))
}

#[utoipa::path(
    get,
    path = "/api/records/date",
    params(DateParam),
    responses(
        (status = 200, description = "Records for the given date, newest first", body = Vec<RecordResponse>),
        (status = 400, description = "Missing or malformed date", body = common_errors::ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "records"
)]
#[instrument(skip_all)]
pub async fn date_records(
    State(services): State<RecordServices>, claims: AuthClaims,
    Query(params): Query<DateParam>,
) -> Result<Json<Vec<RecordResponse>>, AppError> {
    let Some(date) = params.date else {
        return Err(AppError::bad_request("MISSING_PARAMS", "date is required"));
    };

    let query = DateRecordsQuery {
        user_id: claims.user_id,
        date,
    };
    Ok(Json(services.date_records.execute(query).await?))
}

#[utoipa::path(
    delete,
    path = "/api/records/delete/{id}",
    params(
        ("id" = Uuid, Path, description = "Record ID")
    ),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Record not found", body = common_errors::ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "records"
)]
#[instrument(skip_all)]
pub async fn delete_record(
    State(services): State<RecordServices>, claims: AuthClaims,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let command = DeleteRecordCommand {
        record_id: id,
        user_id: claims.user_id,
    };
    services.delete_record.execute(command).await?;

    tracing::info!("record deleted: {id}");

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/stat/week",
    params(WeekRangeParams),
    responses(
        (status = 200, description = "Weekly per-tag summary", body = Vec<WeekTagStat>),
        (status = 400, description = "Missing parameters", body = common_errors::ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "stats"
)]
#[instrument(skip_all)]
pub async fn week_stats(
    State(services): State<RecordServices>, claims: AuthClaims,
    Query(params): Query<WeekRangeParams>,
) -> Result<Json<Vec<WeekTagStat>>, AppError> {
    let (week_start, week_end) = week_range(params)?;

    let query = WeekStatsQuery {
        user_id: claims.user_id,
        week_start,
        week_end,
    };
    Ok(Json(services.week_stats.execute(query).await?))
}

#[utoipa::path(
    get,
    path = "/api/stat/year",
    params(YearParam),
    responses(
        (status = 200, description = "Year statistics with month distribution", body = YearStats),
        (status = 400, description = "Missing parameters", body = common_errors::ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "stats"
)]
#[instrument(skip_all)]
pub async fn year_stats(
    State(services): State<RecordServices>, claims: AuthClaims,
    Query(params): Query<YearParam>,
) -> Result<Json<YearStats>, AppError> {
    let Some(year) = params.year else {
        return Err(AppError::bad_request("MISSING_PARAMS", "year is required"));
    };

    let query = YearStatsQuery {
        user_id: claims.user_id,
        year,
    };
    Ok(Json(services.year_stats.execute(query).await?))
}

#[utoipa::path(
    get,
    path = "/api/stats/yearly",
    params(YearParam),
    responses(
        (status = 200, description = "Yearly summary with monthly trend", body = YearlySummary),
        (status = 401, description = "Missing or invalid token", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "stats"
)]
#[instrument(skip_all)]
pub async fn yearly_stats(
    State(services): State<RecordServices>, claims: AuthClaims,
    Query(params): Query<YearParam>,
) -> Result<Json<YearlySummary>, AppError> {
    let query = YearlyStatsQuery {
        user_id: claims.user_id,
        year: params.year,
    };
    Ok(Json(services.yearly_stats.execute(query).await?))
}

#[utoipa::path(
    get,
    path = "/api/stats/monthly",
    params(MonthParams),
    responses(
        (status = 200, description = "Monthly summary with daily average", body = MonthlySummary),
        (status = 400, description = "Invalid month", body = common_errors::ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "stats"
)]
#[instrument(skip_all)]
pub async fn monthly_stats(
    State(services): State<RecordServices>, claims: AuthClaims,
    Query(params): Query<MonthParams>,
) -> Result<Json<MonthlySummary>, AppError> {
    let query = MonthlyStatsQuery {
        user_id: claims.user_id,
        year: params.year,
        month: params.month,
    };
    Ok(Json(services.monthly_stats.execute(query).await?))
}

#[utoipa::path(
    get,
    path = "/api/stat/export/week",
    params(WeekRangeParams),
    responses(
        (status = 200, description = "Plain-text weekly report", body = String),
        (status = 400, description = "Missing parameters", body = common_errors::ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "stats"
)]
#[instrument(skip_all)]
pub async fn export_week(
    State(services): State<RecordServices>, claims: AuthClaims,
    Query(params): Query<WeekRangeParams>,
) -> Result<String, AppError> {
    let (week_start, week_end) = week_range(params)?;

    let query = ExportWeekQuery {
        user_id: claims.user_id,
        week_start,
        week_end,
    };
    Ok(services.export_week.execute(query).await?)
}

#[utoipa::path(
    get,
    path = "/api/stat/export/year",
    params(YearParam),
    responses(
        (status = 200, description = "Plain-text annual report", body = String),
        (status = 400, description = "Missing parameters", body = common_errors::ApiErrorResponse),
        (status = 401, description = "Missing or invalid token", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "stats"
)]
#[instrument(skip_all)]
pub async fn export_year(
    State(services): State<RecordServices>, claims: AuthClaims,
    Query(params): Query<YearParam>,
) -> Result<String, AppError> {
    let Some(year) = params.year else {
        return Err(AppError::bad_request("MISSING_PARAMS", "year is required"));
    };

    let query = ExportYearQuery {
        user_id: claims.user_id,
        year,
    };
    Ok(services.export_year.execute(query).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_range_requires_both_bounds() {
        let ok = week_range(WeekRangeParams {
            week_start: Some("2026-02-16".into()),
            week_end: Some("2026-02-22".into()),
        })
        .unwrap();
        assert_eq!(ok, ("2026-02-16".to_string(), "2026-02-22".to_string()));

        assert!(
            week_range(WeekRangeParams {
                week_start: Some("2026-02-16".into()),
                week_end: None,
            })
            .is_err()
        );
        assert!(
            week_range(WeekRangeParams {
                week_start: None,
                week_end: None,
            })
            .is_err()
        );
    }
}
