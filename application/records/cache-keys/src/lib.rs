use stats_cache::stat_cache_key;

pub use stats_cache::key::StatCacheKey;

stat_cache_key!(WeekStatsKey => "week", "{}_{}"[week_start: str, week_end: str]);
stat_cache_key!(YearStatsKey => "year", "{}"[year: str]);
stat_cache_key!(YearlyStatsKey => "yearly_stats", "{}"[year: str]);
stat_cache_key!(MonthlyStatsKey => "monthly_stats", "{}-{:02}"[year: i32, month: u32]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_compose_user_category_and_params() {
        assert_eq!(
            WeekStatsKey.key_for("u1", ("2026-02-16", "2026-02-22")),
            "u1:week:2026-02-16_2026-02-22"
        );
        assert_eq!(YearStatsKey.key_for("u1", ("2026",)), "u1:year:2026");
        assert_eq!(
            YearlyStatsKey.key_for("u1", ("2026",)),
            "u1:yearly_stats:2026"
        );
    }

    #[test]
    fn monthly_key_zero_pads_the_month() {
        assert_eq!(
            MonthlyStatsKey.key_for("u1", (&2026, &2)),
            "u1:monthly_stats:2026-02"
        );
        assert_eq!(
            MonthlyStatsKey.key_for("u1", (&2026, &11)),
            "u1:monthly_stats:2026-11"
        );
    }

    #[test]
    fn categories_keep_keys_apart_for_the_same_params() {
        let year = YearStatsKey.key_for("u1", ("2026",));
        let yearly = YearlyStatsKey.key_for("u1", ("2026",));
        assert_ne!(year, yearly);
    }
}
