use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TodayRecordsQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DateRecordsQuery {
    pub user_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct WeekStatsQuery {
    pub user_id: String,
    pub week_start: String,
    pub week_end: String,
}

#[derive(Debug, Deserialize)]
pub struct YearStatsQuery {
    pub user_id: String,
    pub year: String,
}

#[derive(Debug, Deserialize)]
pub struct YearlyStatsQuery {
    pub user_id: String,
    /// Defaults to the current year.
    pub year: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyStatsQuery {
    pub user_id: String,
    /// Both default to the current year/month.
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ExportWeekQuery {
    pub user_id: String,
    pub week_start: String,
    pub week_end: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportYearQuery {
    pub user_id: String,
    pub year: String,
}
