//! Pure reducers from flat record lists to summary statistics.
//!
//! Every function here is deterministic and free of I/O, so handlers can
//! call them from any number of tasks at once. Tag groups accumulate in a
//! `BTreeMap`, which fixes the output order and makes repeated runs over
//! the same input byte-identical.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use record_models::{Record, Tag};
use record_responses::{
    MonthHours, MonthlySummary, MonthlyTagStat, MonthlyTrend, WeekTagStat,
    YearStats, YearTagStat, YearlySummary, YearlyTagStat,
};

/// Round half-up to two decimals, applied after scaling by 100.
fn round2(value: f64) -> f64 { (value * 100.0).round() / 100.0 }

pub fn week_tag_stats(records: &[Record]) -> Vec<WeekTagStat> {
    let mut groups: BTreeMap<Tag, (u32, f64)> = BTreeMap::new();

    for record in records {
        let entry = groups.entry(record.tag).or_default();
        entry.0 += 1;
        entry.1 += f64::from(record.duration) / 60.0;
    }

    groups
        .into_iter()
        .map(|(tag, (count, hours))| WeekTagStat {
            tag,
            count,
            total_hours: round2(hours),
        })
        .collect()
}

/// Year rollup: per-tag hours with percentage ratios, a 12-month hour
/// distribution and the extreme months.
///
/// Ratios come from the unrounded sums and are rounded afterwards; the
/// extremes compare the already-rounded month totals. Records whose
/// `created_at` month does not parse keep their tag contribution but skip
/// the month buckets.
pub fn year_stats(records: &[Record]) -> YearStats {
    let mut month_raw = [0.0f64; 12];
    let mut groups: BTreeMap<Tag, (u32, f64)> = BTreeMap::new();
    let mut total_hours = 0.0;

    for record in records {
        let hours = f64::from(record.duration) / 60.0;
        let entry = groups.entry(record.tag).or_default();
        entry.0 += 1;
        entry.1 += hours;
        total_hours += hours;

        if let Some(month) = record.month() {
            month_raw[(month - 1) as usize] += hours;
        }
    }

    let month_hours: Vec<MonthHours> = month_raw
        .iter()
        .enumerate()
        .map(|(index, hours)| MonthHours {
            month: index as u32 + 1,
            total_hours: round2(*hours),
        })
        .collect();

    // Strict comparisons: ties resolve to the earliest month for both
    // extremes.
    let mut max_month = 0;
    let mut max_hours = -1.0;
    let mut min_month = 0;
    let mut min_hours = f64::MAX;
    for entry in &month_hours {
        if entry.total_hours > max_hours {
            max_hours = entry.total_hours;
            max_month = entry.month;
        }
        if entry.total_hours < min_hours {
            min_hours = entry.total_hours;
            min_month = entry.month;
        }
    }

    let tag_stats = groups
        .into_iter()
        .map(|(tag, (count, hours))| YearTagStat {
            tag,
            count,
            total_hours: round2(hours),
            ratio: if total_hours > 0.0 {
                round2(hours / total_hours * 100.0)
            }
            else {
                0.0
            },
        })
        .collect();

    YearStats {
        tag_stats,
        month_hours,
        max_month,
        max_hours,
        min_month,
        min_hours,
    }
}

/// Alternate year rollup: raw minute totals, per-tag ratio as a plain
/// fraction of the total duration, and a 12-month count/duration trend.
pub fn yearly_summary(records: &[Record]) -> YearlySummary {
    let mut monthly_trend: Vec<MonthlyTrend> = (1..=12)
        .map(|month| MonthlyTrend {
            month,
            count: 0,
            duration: 0,
        })
        .collect();
    let mut groups: BTreeMap<Tag, (u32, i64)> = BTreeMap::new();
    let mut total_duration = 0i64;

    for record in records {
        total_duration += i64::from(record.duration);
        let entry = groups.entry(record.tag).or_default();
        entry.0 += 1;
        entry.1 += i64::from(record.duration);

        if let Some(month) = record.month() {
            let trend = &mut monthly_trend[(month - 1) as usize];
            trend.count += 1;
            trend.duration += i64::from(record.duration);
        }
    }

    let tag_stats = groups
        .into_iter()
        .map(|(tag, (count, duration))| YearlyTagStat {
            tag,
            count,
            duration,
            ratio: if total_duration > 0 {
                duration as f64 / total_duration as f64
            }
            else {
                0.0
            },
        })
        .collect();

    YearlySummary {
        total_records: records.len() as u32,
        total_duration,
        tag_stats,
        monthly_trend,
    }
}

pub fn monthly_summary(
    records: &[Record], days_in_month: u32,
) -> MonthlySummary {
    let mut groups: BTreeMap<Tag, (u32, i64)> = BTreeMap::new();

    for record in records {
        let entry = groups.entry(record.tag).or_default();
        entry.0 += 1;
        entry.1 += i64::from(record.duration);
    }

    MonthlySummary {
        daily_average: records.len() as f64 / f64::from(days_in_month),
        tag_stats: groups
            .into_iter()
            .map(|(tag, (count, duration))| MonthlyTagStat {
                tag,
                count,
                duration,
            })
            .collect(),
    }
}

/// Calendar length of a month, leap years included. `None` for an invalid
/// month number.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    }
    else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}

pub fn render_week_report(
    week_start: &str, week_end: &str, records: &[Record],
) -> String {
    let mut report = format!("Weekly summary ({week_start} ~ {week_end})\n\n");

    let mut total = 0i64;
    for record in records {
        report.push_str(&format!(
            "- [{}] {} ({} min)\n",
            record.tag, record.content, record.duration
        ));
        total += i64::from(record.duration);
    }

    report.push_str(&format!(
        "\nTotal time: {:.1} hours",
        total as f64 / 60.0
    ));
    report
}

pub fn render_year_report(year: &str, records: &[Record]) -> String {
    let mut totals: BTreeMap<Tag, i64> = BTreeMap::new();
    for record in records {
        *totals.entry(record.tag).or_default() += i64::from(record.duration);
    }

    let mut report = format!("{year} annual report\n\nTime by tag:\n");
    for (tag, duration) in totals {
        report.push_str(&format!(
            "- {tag}: {:.1} hours\n",
            duration as f64 / 60.0
        ));
    }
    report
}

#[cfg(test)]
mod tests {
    use record_models::Tag;
    use test_utils::record;

    use super::*;

    #[test]
    fn weekly_groups_by_tag_and_converts_minutes_to_hours() {
        let records = vec![
            record(Tag::Work, 60, "2026-02-21 10:00:00"),
            record(Tag::Work, 30, "2026-02-21 12:00:00"),
        ];

        let stats = week_tag_stats(&records);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].tag, Tag::Work);
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].total_hours, 1.5);
    }

    #[test]
    fn weekly_rounds_hours_to_two_decimals() {
        let records = vec![
            record(Tag::Study, 50, "2026-02-21 10:00:00"),
            record(Tag::Work, 100, "2026-02-21 12:00:00"),
        ];

        let stats = week_tag_stats(&records);

        assert_eq!(stats[0].tag, Tag::Work);
        assert_eq!(stats[0].total_hours, 1.67);
        assert_eq!(stats[1].tag, Tag::Study);
        assert_eq!(stats[1].total_hours, 0.83);
    }

    #[test]
    fn weekly_of_nothing_is_empty() {
        assert!(week_tag_stats(&[]).is_empty());
    }

    #[test]
    fn year_stats_fill_all_twelve_months() {
        let records = vec![
            record(Tag::Work, 120, "2026-03-01 09:00:00"),
            record(Tag::Work, 60, "2026-03-15 09:00:00"),
        ];

        let stats = year_stats(&records);

        assert_eq!(stats.month_hours.len(), 12);
        assert_eq!(stats.month_hours[2].month, 3);
        assert_eq!(stats.month_hours[2].total_hours, 3.0);
        for entry in &stats.month_hours {
            if entry.month != 3 {
                assert_eq!(entry.total_hours, 0.0);
            }
        }
    }

    #[test]
    fn year_extremes_tie_break_to_the_earliest_month() {
        // Everything in March: max is March, min is the first zero month.
        let records = vec![record(Tag::Work, 90, "2026-03-01 09:00:00")];

        let stats = year_stats(&records);

        assert_eq!(stats.max_month, 3);
        assert_eq!(stats.max_hours, 1.5);
        assert_eq!(stats.min_month, 1);
        assert_eq!(stats.min_hours, 0.0);
    }

    #[test]
    fn year_ratios_are_percentages_of_total_hours() {
        let records = vec![
            record(Tag::Work, 60, "2026-01-01 09:00:00"),
            record(Tag::Work, 60, "2026-02-01 09:00:00"),
            record(Tag::Study, 60, "2026-03-01 09:00:00"),
        ];

        let stats = year_stats(&records);

        assert_eq!(stats.tag_stats[0].tag, Tag::Work);
        assert_eq!(stats.tag_stats[0].ratio, 66.67);
        assert_eq!(stats.tag_stats[1].tag, Tag::Study);
        assert_eq!(stats.tag_stats[1].ratio, 33.33);
    }

    #[test]
    fn year_of_nothing_is_all_zeros_not_nan() {
        let stats = year_stats(&[]);

        assert!(stats.tag_stats.is_empty());
        assert_eq!(stats.month_hours.len(), 12);
        assert!(stats.month_hours.iter().all(|m| m.total_hours == 0.0));
        assert_eq!(stats.max_month, 1);
        assert_eq!(stats.max_hours, 0.0);
        assert_eq!(stats.min_month, 1);
        assert_eq!(stats.min_hours, 0.0);
    }

    #[test]
    fn zero_duration_year_has_zero_ratios() {
        let records = vec![record(Tag::Work, 0, "2026-03-01 09:00:00")];

        let stats = year_stats(&records);

        assert_eq!(stats.tag_stats[0].ratio, 0.0);
    }

    #[test]
    fn unparseable_month_skips_the_bucket_but_keeps_tag_totals() {
        let records = vec![
            record(Tag::Work, 60, "2026-03-01 09:00:00"),
            record(Tag::Work, 60, "garbage"),
        ];

        let stats = year_stats(&records);

        assert_eq!(stats.tag_stats[0].count, 2);
        assert_eq!(stats.tag_stats[0].total_hours, 2.0);
        assert_eq!(stats.month_hours[2].total_hours, 1.0);

        let bucketed: f64 =
            stats.month_hours.iter().map(|m| m.total_hours).sum();
        assert_eq!(bucketed, 1.0);
    }

    #[test]
    fn yearly_summary_keeps_raw_minutes_and_fraction_ratios() {
        let records = vec![
            record(Tag::Work, 90, "2026-01-10 09:00:00"),
            record(Tag::Work, 30, "2026-02-10 09:00:00"),
            record(Tag::Leisure, 40, "2026-02-11 09:00:00"),
        ];

        let summary = yearly_summary(&records);

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.total_duration, 160);

        assert_eq!(summary.tag_stats[0].tag, Tag::Work);
        assert_eq!(summary.tag_stats[0].duration, 120);
        assert_eq!(summary.tag_stats[0].ratio, 0.75);
        assert_eq!(summary.tag_stats[1].tag, Tag::Leisure);
        assert_eq!(summary.tag_stats[1].ratio, 0.25);

        assert_eq!(summary.monthly_trend.len(), 12);
        assert_eq!(summary.monthly_trend[0].count, 1);
        assert_eq!(summary.monthly_trend[0].duration, 90);
        assert_eq!(summary.monthly_trend[1].count, 2);
        assert_eq!(summary.monthly_trend[1].duration, 70);
    }

    #[test]
    fn yearly_summary_of_nothing_is_zeroed() {
        let summary = yearly_summary(&[]);

        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.total_duration, 0);
        assert!(summary.tag_stats.is_empty());
        assert_eq!(summary.monthly_trend.len(), 12);
        assert!(
            summary
                .monthly_trend
                .iter()
                .all(|t| t.count == 0 && t.duration == 0)
        );
    }

    #[test]
    fn monthly_summary_averages_over_the_calendar_days() {
        let records = vec![
            record(Tag::Work, 60, "2026-02-01 09:00:00"),
            record(Tag::Work, 60, "2026-02-02 09:00:00"),
            record(Tag::Chores, 20, "2026-02-02 19:00:00"),
        ];

        let summary = monthly_summary(&records, 28);

        assert_eq!(summary.daily_average, 3.0 / 28.0);
        assert_eq!(summary.tag_stats[0].tag, Tag::Work);
        assert_eq!(summary.tag_stats[0].count, 2);
        assert_eq!(summary.tag_stats[0].duration, 120);
        assert_eq!(summary.tag_stats[1].tag, Tag::Chores);
        assert_eq!(summary.tag_stats[1].duration, 20);
    }

    #[test]
    fn monthly_summary_of_nothing_is_zeroed() {
        let summary = monthly_summary(&[], 31);
        assert_eq!(summary.daily_average, 0.0);
        assert!(summary.tag_stats.is_empty());
    }

    #[test]
    fn days_in_month_knows_the_calendar() {
        assert_eq!(days_in_month(2026, 1), Some(31));
        assert_eq!(days_in_month(2026, 2), Some(28));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(2100, 2), Some(28));
        assert_eq!(days_in_month(2026, 4), Some(30));
        assert_eq!(days_in_month(2026, 12), Some(31));
        assert_eq!(days_in_month(2026, 13), None);
        assert_eq!(days_in_month(2026, 0), None);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let records = vec![
            record(Tag::Leisure, 45, "2026-05-01 09:00:00"),
            record(Tag::Work, 60, "2026-03-01 09:00:00"),
            record(Tag::Study, 30, "2026-03-02 09:00:00"),
            record(Tag::Work, 15, "2026-07-01 09:00:00"),
        ];

        let first = serde_json::to_string(&year_stats(&records)).unwrap();
        let second = serde_json::to_string(&year_stats(&records)).unwrap();
        assert_eq!(first, second);

        let first = serde_json::to_string(&yearly_summary(&records)).unwrap();
        let second = serde_json::to_string(&yearly_summary(&records)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn week_report_lists_records_and_totals_hours() {
        let mut logged = record(Tag::Work, 60, "2026-02-16 10:00:00");
        logged.content = "sprint planning".into();
        let records = vec![logged, record(Tag::Study, 30, "2026-02-17 10:00:00")];

        let report = render_week_report("2026-02-16", "2026-02-22", &records);

        assert!(report.starts_with("Weekly summary (2026-02-16 ~ 2026-02-22)"));
        assert!(report.contains("- [work] sprint planning (60 min)"));
        assert!(report.ends_with("Total time: 1.5 hours"));
    }

    #[test]
    fn year_report_totals_by_tag() {
        let records = vec![
            record(Tag::Work, 90, "2026-01-10 09:00:00"),
            record(Tag::Work, 30, "2026-06-10 09:00:00"),
        ];

        let report = render_year_report("2026", &records);

        assert!(report.starts_with("2026 annual report"));
        assert!(report.contains("- work: 2.0 hours"));
    }
}
