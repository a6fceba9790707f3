// crates/core/src/streaks.rs
//! Day-streak calculations over calendar dates.
//!
//! Both functions take the dates in any order and ignore duplicates, so they
//! can be fed straight from a daily-score slice.

use chrono::{Days, NaiveDate};

fn sorted_unique(dates: impl IntoIterator<Item = NaiveDate>) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = dates.into_iter().collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Consecutive days ending today.
///
/// Walks the dates newest-first; the `i`-th date must be exactly `today - i`
/// days. A history whose newest day is not `today` has a streak of 0.
pub fn current_streak(dates: impl IntoIterator<Item = NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0u32;
    for (i, date) in sorted_unique(dates).into_iter().rev().enumerate() {
        let expected = today.checked_sub_days(Days::new(i as u64));
        if expected != Some(date) {
            break;
        }
        streak += 1;
    }
    streak
}

/// Longest run of consecutive days anywhere in the history.
pub fn longest_streak(dates: impl IntoIterator<Item = NaiveDate>) -> u32 {
    let dates = sorted_unique(dates);
    let Some(first) = dates.first() else {
        return 0;
    };

    let mut longest = 0u32;
    let mut run = 1u32;
    let mut prev = *first;
    for &date in &dates[1..] {
        if (date - prev).num_days() == 1 {
            run += 1;
        } else {
            longest = longest.max(run);
            run = 1;
        }
        prev = date;
    }

    // The last run never hits the reset branch.
    longest.max(run)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn days_back(today: NaiveDate, offsets: &[u64]) -> Vec<NaiveDate> {
        offsets
            .iter()
            .map(|o| today.checked_sub_days(Days::new(*o)).unwrap())
            .collect()
    }

    #[test]
    fn test_current_streak_empty() {
        assert_eq!(current_streak(Vec::new(), day(2024, 6, 10)), 0);
    }

    #[test]
    fn test_current_streak_contiguous_through_today() {
        let today = day(2024, 6, 10);
        assert_eq!(current_streak(days_back(today, &[0, 1, 2]), today), 3);
    }

    #[test]
    fn test_current_streak_is_zero_without_today() {
        let today = day(2024, 6, 10);
        // Yesterday and the day before exist, today does not.
        assert_eq!(current_streak(days_back(today, &[1, 2]), today), 0);
    }

    #[test]
    fn test_current_streak_stops_at_gap() {
        let today = day(2024, 6, 10);
        assert_eq!(current_streak(days_back(today, &[0, 1, 3, 4, 5]), today), 2);
    }

    #[test]
    fn test_current_streak_ignores_order_and_duplicates() {
        let today = day(2024, 6, 10);
        let dates = days_back(today, &[2, 0, 1, 0, 1]);
        assert_eq!(current_streak(dates, today), 3);
    }

    #[test]
    fn test_current_streak_ignores_future_rows() {
        let today = day(2024, 6, 10);
        let mut dates = days_back(today, &[0, 1]);
        dates.push(day(2024, 6, 11));
        // A row dated after today can never match offset 0.
        assert_eq!(current_streak(dates, today), 0);
    }

    #[test]
    fn test_current_streak_across_month_boundary() {
        let today = day(2024, 3, 2);
        let dates = vec![day(2024, 3, 2), day(2024, 3, 1), day(2024, 2, 29), day(2024, 2, 28)];
        assert_eq!(current_streak(dates, today), 4);
    }

    #[test]
    fn test_longest_streak_empty() {
        assert_eq!(longest_streak(Vec::new()), 0);
    }

    #[test]
    fn test_longest_streak_single_day() {
        assert_eq!(longest_streak(vec![day(2024, 1, 1)]), 1);
    }

    #[test]
    fn test_longest_streak_keeps_final_run() {
        // 2-day run, gap, then 4-day run at the end.
        let dates = vec![
            day(2024, 1, 1),
            day(2024, 1, 2),
            day(2024, 1, 5),
            day(2024, 1, 6),
            day(2024, 1, 7),
            day(2024, 1, 8),
        ];
        assert_eq!(longest_streak(dates), 4);
    }

    #[test]
    fn test_longest_streak_prefers_earlier_longer_run() {
        let dates = vec![
            day(2024, 1, 1),
            day(2024, 1, 2),
            day(2024, 1, 3),
            day(2024, 1, 10),
        ];
        assert_eq!(longest_streak(dates), 3);
    }

    #[test]
    fn test_longest_streak_duplicates_do_not_break_run() {
        let dates = vec![day(2024, 1, 1), day(2024, 1, 2), day(2024, 1, 2), day(2024, 1, 3)];
        assert_eq!(longest_streak(dates), 3);
    }

    #[test]
    fn test_gapless_history_streaks_match_length() {
        let today = day(2024, 6, 10);
        let dates = days_back(today, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(current_streak(dates.clone(), today), 10);
        assert_eq!(longest_streak(dates), 10);
    }
}
