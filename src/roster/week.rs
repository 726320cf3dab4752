//! Monday and quarter date arithmetic used by scheduling runs.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Monday of the week `date` falls in
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// The Monday a freshly generated schedule targets: today when today is
/// already Monday, otherwise the next one.
pub fn upcoming_monday(today: NaiveDate) -> NaiveDate {
    let offset = (7 - today.weekday().num_days_from_monday()) % 7;
    today + Days::new(u64::from(offset))
}

/// Sunday closing the week that starts at `week_start`
pub fn week_end(week_start: NaiveDate) -> NaiveDate {
    week_start + Days::new(6)
}

/// First day of `date`'s calendar quarter (Jan 1 / Apr 1 / Jul 1 / Oct 1)
pub fn quarter_start(date: NaiveDate) -> NaiveDate {
    let month = (date.month0() / 3) * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), month, 1).expect("quarter month is a valid month")
}

/// Whether `date` is a Monday
pub fn is_monday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Mon
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_upcoming_monday_is_today_on_monday() {
        let monday = date(2025, 8, 18);
        assert_eq!(upcoming_monday(monday), monday);
    }

    #[test]
    fn test_upcoming_monday_from_midweek() {
        assert_eq!(upcoming_monday(date(2025, 8, 19)), date(2025, 8, 25)); // Tuesday
        assert_eq!(upcoming_monday(date(2025, 8, 22)), date(2025, 8, 25)); // Friday
        assert_eq!(upcoming_monday(date(2025, 8, 24)), date(2025, 8, 25)); // Sunday
    }

    #[test]
    fn test_upcoming_monday_crosses_month_boundary() {
        assert_eq!(upcoming_monday(date(2025, 8, 30)), date(2025, 9, 1));
    }

    #[test]
    fn test_week_monday_normalizes_any_weekday() {
        let monday = date(2025, 8, 18);
        for offset in 0..7u64 {
            assert_eq!(week_monday(monday + Days::new(offset)), monday);
        }
    }

    #[test]
    fn test_week_end_is_sunday() {
        assert_eq!(week_end(date(2025, 8, 18)), date(2025, 8, 24));
        assert!(week_end(date(2025, 8, 18)).weekday() == Weekday::Sun);
    }

    #[test]
    fn test_quarter_start_boundaries() {
        assert_eq!(quarter_start(date(2025, 1, 1)), date(2025, 1, 1));
        assert_eq!(quarter_start(date(2025, 3, 31)), date(2025, 1, 1));
        assert_eq!(quarter_start(date(2025, 4, 1)), date(2025, 4, 1));
        assert_eq!(quarter_start(date(2025, 8, 21)), date(2025, 7, 1));
        assert_eq!(quarter_start(date(2025, 12, 31)), date(2025, 10, 1));
    }

    #[test]
    fn test_is_monday() {
        assert!(is_monday(date(2025, 8, 18)));
        assert!(!is_monday(date(2025, 8, 21)));
    }
}
