use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Default reply window applied when a document carries a date but no
/// explicit deadline.
pub const DEFAULT_DEADLINE_WORKDAYS: u32 = 5;

/// Advances `start` by `days` working days, skipping Saturdays and
/// Sundays. The start day itself is not counted.
pub fn add_working_days(start: NaiveDate, days: u32) -> NaiveDate {
    let mut date = start;
    let mut remaining = days;
    while remaining > 0 {
        date += Duration::days(1);
        if !is_weekend(date) {
            remaining -= 1;
        }
    }
    date
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Deadline inference policy: an explicit deadline wins; otherwise a
/// document date implies `date + DEFAULT_DEADLINE_WORKDAYS` working days;
/// otherwise the deadline stays blank for manual entry.
pub fn infer_deadline(
    explicit: Option<NaiveDate>,
    document_date: Option<NaiveDate>,
) -> Option<NaiveDate> {
    explicit.or_else(|| document_date.map(|d| add_working_days(d, DEFAULT_DEADLINE_WORKDAYS)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn working_days_skip_weekends() {
        // 2024-01-10 is a Wednesday; five working days later is the next
        // Wednesday, 2024-01-17.
        assert_eq!(add_working_days(date("2024-01-10"), 5), date("2024-01-17"));
        // Friday + 1 working day lands on Monday.
        assert_eq!(add_working_days(date("2024-01-12"), 1), date("2024-01-15"));
        // Starting on a Saturday still counts only weekdays.
        assert_eq!(add_working_days(date("2024-01-13"), 1), date("2024-01-15"));
        assert_eq!(add_working_days(date("2024-01-10"), 0), date("2024-01-10"));
    }

    #[test]
    fn explicit_deadline_wins() {
        assert_eq!(
            infer_deadline(Some(date("2024-02-01")), Some(date("2024-01-10"))),
            Some(date("2024-02-01"))
        );
    }

    #[test]
    fn document_date_implies_default_offset() {
        assert_eq!(
            infer_deadline(None, Some(date("2024-01-10"))),
            Some(date("2024-01-17"))
        );
    }

    #[test]
    fn nothing_extracted_leaves_deadline_blank() {
        assert_eq!(infer_deadline(None, None), None);
    }
}
