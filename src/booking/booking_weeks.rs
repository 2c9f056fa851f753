use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeSet;

/// Furthest week a range may reach, counted from the current week.
pub const MAX_WEEK_OFFSET: i64 = 52;

/// Monday of the week containing `day`.
fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

/// Week offsets the booking site has to be queried for so that every
/// target date is covered. Week 0 is the Monday-to-Sunday week containing
/// `today`; dates before `today` are skipped.
pub fn week_offsets_for_dates(dates: &[NaiveDate], today: NaiveDate) -> Vec<u32> {
    let monday = week_start(today);

    dates
        .iter()
        .filter(|date| **date >= today)
        .map(|date| ((*date - monday).num_days() / 7) as u32)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Expands a week range such as `"0-3"` into every date of those weeks,
/// counted from the week containing `today`. Ranges ending after
/// [`MAX_WEEK_OFFSET`] are rejected.
pub fn expand_week_range(input: &str, today: NaiveDate) -> Option<Vec<NaiveDate>> {
    let (start, end) = input.trim().split_once('-')?;
    if start.is_empty()
        || end.is_empty()
        || !start.chars().all(|c| c.is_ascii_digit())
        || !end.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let start: i64 = start.parse().ok()?;
    let end: i64 = end.parse().ok()?;
    if start > end || end > MAX_WEEK_OFFSET {
        return None;
    }

    let monday = week_start(today);
    (start * 7..(end + 1) * 7)
        .map(|day| monday.checked_add_signed(Duration::days(day)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // 2025-12-31 is a Wednesday.
    const TODAY: &str = "2025-12-31";

    #[test]
    fn test_week_offsets_are_monday_aligned() {
        let today = date(TODAY);
        let dates = [
            date("2026-01-04"), // Sunday, same week
            date("2026-01-05"), // Monday, next week
            date("2026-01-19"),
        ];
        assert_eq!(week_offsets_for_dates(&dates, today), vec![0, 1, 3]);
    }

    #[test]
    fn test_week_offsets_skip_past_and_dedupe() {
        let today = date(TODAY);
        let dates = [
            date("2025-12-30"),
            date("2026-01-07"),
            date("2026-01-06"),
            date("2025-12-31"),
        ];
        assert_eq!(week_offsets_for_dates(&dates, today), vec![0, 1]);
    }

    #[test]
    fn test_week_offsets_all_past() {
        let today = date(TODAY);
        assert!(week_offsets_for_dates(&[date("2025-01-01")], today).is_empty());
    }

    #[test]
    fn test_expand_week_range() {
        let dates = expand_week_range("0-1", date(TODAY)).unwrap();
        assert_eq!(dates.len(), 14);
        assert_eq!(dates.first(), Some(&date("2025-12-29")));
        assert_eq!(dates.last(), Some(&date("2026-01-11")));
    }

    #[test]
    fn test_expand_week_range_rejects_garbage() {
        let today = date(TODAY);
        assert_eq!(expand_week_range("2025-12-30", today), None);
        assert_eq!(expand_week_range("3-1", today), None);
        assert_eq!(expand_week_range("-1", today), None);
        assert_eq!(expand_week_range("a-b", today), None);
    }

    #[test]
    fn test_expand_week_range_caps_far_weeks() {
        let today = date(TODAY);
        assert_eq!(expand_week_range("99999999-99999999", today), None);
        assert_eq!(expand_week_range("0-3000", today), None);
        assert_eq!(expand_week_range("0-53", today), None);

        let longest = expand_week_range("0-52", today).unwrap();
        assert_eq!(longest.len(), 53 * 7);
    }

    #[test]
    fn test_expand_week_range_near_max_date() {
        assert_eq!(expand_week_range("0-52", NaiveDate::MAX), None);
    }
}
