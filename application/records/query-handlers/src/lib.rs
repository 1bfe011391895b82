//! Query side of the records domain.
//!
//! Statistics handlers all follow the same flow: build the typed cache
//! key, try the cache, and on a miss fetch the raw records from the
//! store, reduce them with [`aggregate`], store the result and return
//! it. An upstream failure propagates before the cache is touched, so
//! the next request recomputes from scratch.

pub mod aggregate;

use std::sync::Arc;

use chrono::{Datelike, Utc};
use record_cache_keys::{
    MonthlyStatsKey, StatCacheKey, WeekStatsKey, YearStatsKey, YearlyStatsKey,
};
use record_dao::RecordDao;
use record_errors::RecordError;
use record_queries::{
    DateRecordsQuery, ExportWeekQuery, ExportYearQuery, MonthlyStatsQuery,
    TodayRecordsQuery, WeekStatsQuery, YearStatsQuery, YearlyStatsQuery,
};
use record_responses::{
    MonthlySummary, RecordResponse, WeekTagStat, YearStats, YearlySummary,
};
use sql_connection::SqlConnect;
use stats_cache::StatsCache;
use tracing::instrument;

fn day_bounds(date: &str) -> (String, String) {
    (format!("{date} 00:00:00"), format!("{date} 23:59:59"))
}

#[derive(Clone)]
pub struct TodayRecordsQueryHandler {
    record_dao: RecordDao,
}

impl TodayRecordsQueryHandler {
    pub fn new(db: SqlConnect) -> Self {
        Self {
            record_dao: RecordDao::new(db),
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: TodayRecordsQuery,
    ) -> Result<Vec<RecordResponse>, RecordError> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let (start, end) = day_bounds(&today);
        let records = self
            .record_dao
            .find_in_range(&query.user_id, &start, &end)
            .await?;
        Ok(records.into_iter().map(Into::into).collect())
    }
}

#[derive(Clone)]
pub struct DateRecordsQueryHandler {
    record_dao: RecordDao,
}

impl DateRecordsQueryHandler {
    pub fn new(db: SqlConnect) -> Self {
        Self {
            record_dao: RecordDao::new(db),
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: DateRecordsQuery,
    ) -> Result<Vec<RecordResponse>, RecordError> {
        if chrono::NaiveDate::parse_from_str(&query.date, "%Y-%m-%d").is_err()
        {
            return Err(RecordError::Validation(
                "date must be formatted as YYYY-MM-DD".into(),
            ));
        }

        let (start, end) = day_bounds(&query.date);
        let records = self
            .record_dao
            .find_in_range(&query.user_id, &start, &end)
            .await?;
        Ok(records.into_iter().map(Into::into).collect())
    }
}

#[derive(Clone)]
pub struct WeekStatsQueryHandler {
    record_dao: RecordDao,
    cache: Arc<StatsCache>,
}

impl WeekStatsQueryHandler {
    pub fn new(db: SqlConnect, cache: Arc<StatsCache>) -> Self {
        Self {
            record_dao: RecordDao::new(db),
            cache,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: WeekStatsQuery,
    ) -> Result<Vec<WeekTagStat>, RecordError> {
        let key = WeekStatsKey
            .key_for(&query.user_id, (&query.week_start, &query.week_end));

        if let Some(stats) = self.cache.get::<Vec<WeekTagStat>>(&key) {
            tracing::debug!("cache hit for {key}");
            return Ok(stats);
        }
        tracing::debug!("cache miss for {key}, fetching from record store");

        let (start, _) = day_bounds(&query.week_start);
        let (_, end) = day_bounds(&query.week_end);
        let records = self
            .record_dao
            .find_in_range(&query.user_id, &start, &end)
            .await?;

        let stats = aggregate::week_tag_stats(&records);
        self.cache.set(key, &stats);
        Ok(stats)
    }
}

#[derive(Clone)]
pub struct YearStatsQueryHandler {
    record_dao: RecordDao,
    cache: Arc<StatsCache>,
}

impl YearStatsQueryHandler {
    pub fn new(db: SqlConnect, cache: Arc<StatsCache>) -> Self {
        Self {
            record_dao: RecordDao::new(db),
            cache,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: YearStatsQuery,
    ) -> Result<YearStats, RecordError> {
        let key = YearStatsKey.key_for(&query.user_id, (&query.year,));

        if let Some(stats) = self.cache.get::<YearStats>(&key) {
            tracing::debug!("cache hit for {key}");
            return Ok(stats);
        }
        tracing::debug!("cache miss for {key}, fetching from record store");

        let records = self
            .record_dao
            .find_by_year(&query.user_id, &query.year)
            .await?;

        let stats = aggregate::year_stats(&records);
        self.cache.set(key, &stats);
        Ok(stats)
    }
}

#[derive(Clone)]
pub struct YearlyStatsQueryHandler {
    record_dao: RecordDao,
    cache: Arc<StatsCache>,
}

impl YearlyStatsQueryHandler {
    pub fn new(db: SqlConnect, cache: Arc<StatsCache>) -> Self {
        Self {
            record_dao: RecordDao::new(db),
            cache,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: YearlyStatsQuery,
    ) -> Result<YearlySummary, RecordError> {
        let year = query
            .year
            .unwrap_or_else(|| Utc::now().year().to_string());

        let key = YearlyStatsKey.key_for(&query.user_id, (&year,));

        if let Some(summary) = self.cache.get::<YearlySummary>(&key) {
            tracing::debug!("cache hit for {key}");
            return Ok(summary);
        }
        tracing::debug!("cache miss for {key}, fetching from record store");

        let start = format!("{year}-01-01 00:00:00");
        let end = format!("{year}-12-31 23:59:59");
        let records = self
            .record_dao
            .find_in_range(&query.user_id, &start, &end)
            .await?;

        let summary = aggregate::yearly_summary(&records);
        self.cache.set(key, &summary);
        Ok(summary)
    }
}

#[derive(Clone)]
pub struct MonthlyStatsQueryHandler {
    record_dao: RecordDao,
    cache: Arc<StatsCache>,
}

impl MonthlyStatsQueryHandler {
    pub fn new(db: SqlConnect, cache: Arc<StatsCache>) -> Self {
        Self {
            record_dao: RecordDao::new(db),
            cache,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: MonthlyStatsQuery,
    ) -> Result<MonthlySummary, RecordError> {
        let now = Utc::now();
        let year = query.year.unwrap_or_else(|| now.year());
        let month = query.month.unwrap_or_else(|| now.month());

        let days_in_month = aggregate::days_in_month(year, month)
            .ok_or_else(|| {
                RecordError::Validation(format!(
                    "invalid year or month: {year}-{month}"
                ))
            })?;

        let key = MonthlyStatsKey.key_for(&query.user_id, (&year, &month));

        if let Some(summary) = self.cache.get::<MonthlySummary>(&key) {
            tracing::debug!("cache hit for {key}");
            return Ok(summary);
        }
        tracing::debug!("cache miss for {key}, fetching from record store");

        let start = format!("{year}-{month:02}-01 00:00:00");
        let end = format!("{year}-{month:02}-{days_in_month} 23:59:59");
        let records = self
            .record_dao
            .find_in_range(&query.user_id, &start, &end)
            .await?;

        let summary = aggregate::monthly_summary(&records, days_in_month);
        self.cache.set(key, &summary);
        Ok(summary)
    }
}

#[derive(Clone)]
pub struct ExportWeekQueryHandler {
    record_dao: RecordDao,
}

impl ExportWeekQueryHandler {
    pub fn new(db: SqlConnect) -> Self {
        Self {
            record_dao: RecordDao::new(db),
        }
    }

    /// Reports reflect the live record set, so exports skip the cache.
    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: ExportWeekQuery,
    ) -> Result<String, RecordError> {
        let (start, _) = day_bounds(&query.week_start);
        let (_, end) = day_bounds(&query.week_end);
        let records = self
            .record_dao
            .find_in_range(&query.user_id, &start, &end)
            .await?;

        Ok(aggregate::render_week_report(
            &query.week_start,
            &query.week_end,
            &records,
        ))
    }
}

#[derive(Clone)]
pub struct ExportYearQueryHandler {
    record_dao: RecordDao,
}

impl ExportYearQueryHandler {
    pub fn new(db: SqlConnect) -> Self {
        Self {
            record_dao: RecordDao::new(db),
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: ExportYearQuery,
    ) -> Result<String, RecordError> {
        let records = self
            .record_dao
            .find_by_year(&query.user_id, &query.year)
            .await?;

        Ok(aggregate::render_year_report(&query.year, &records))
    }
}
