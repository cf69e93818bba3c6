use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Trailing window applied when a request carries no dates.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 90;

/// Resolves the analysis window for a request. A missing end date becomes
/// today's date, a missing start date trails the end date by
/// [`DEFAULT_LOOKBACK_DAYS`]. Pure function of its arguments so callers can
/// pin `now` in tests.
pub fn resolve_window(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    now_utc: DateTime<Utc>,
) -> (NaiveDate, NaiveDate) {
    let end = end_date.unwrap_or_else(|| now_utc.date_naive());
    let start = start_date.unwrap_or(end - Duration::days(DEFAULT_LOOKBACK_DAYS));
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn defaults_to_trailing_ninety_days() {
        let now = Utc.with_ymd_and_hms(2026, 4, 15, 13, 30, 0).unwrap();
        let (start, end) = resolve_window(None, None, now);

        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 4, 15).unwrap());
        assert_eq!((end - start).num_days(), DEFAULT_LOOKBACK_DAYS);
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
    }

    #[test]
    fn formats_as_iso_dates() {
        let now = Utc.with_ymd_and_hms(2026, 4, 15, 0, 0, 0).unwrap();
        let (start, end) = resolve_window(None, None, now);

        assert_eq!(start.format("%Y-%m-%d").to_string(), "2026-01-15");
        assert_eq!(end.format("%Y-%m-%d").to_string(), "2026-04-15");
    }

    #[test]
    fn explicit_dates_pass_through() {
        let now = Utc.with_ymd_and_hms(2026, 4, 15, 0, 0, 0).unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();

        assert_eq!(resolve_window(Some(start), Some(end), now), (start, end));
    }

    #[test]
    fn missing_start_trails_explicit_end() {
        let now = Utc.with_ymd_and_hms(2026, 4, 15, 0, 0, 0).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let (start, resolved_end) = resolve_window(None, Some(end), now);

        assert_eq!(resolved_end, end);
        assert_eq!((end - start).num_days(), DEFAULT_LOOKBACK_DAYS);
    }
}
