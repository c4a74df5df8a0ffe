use chrono::{DateTime, Days, NaiveDate, Utc};
use std::sync::LazyLock;

/// Known puzzle number and the day it was published
const ANCHOR_NUMBER: i64 = 259;
static ANCHOR_DATE: LazyLock<NaiveDate> =
    LazyLock::new(|| NaiveDate::from_ymd_opt(2022, 3, 5).expect("valid anchor date"));

pub fn puzzle_number_for(date: NaiveDate) -> i64 {
    ANCHOR_NUMBER + (date - *ANCHOR_DATE).num_days()
}

pub fn date_for_puzzle(number: i64) -> Option<NaiveDate> {
    let offset = number - ANCHOR_NUMBER;
    let anchor = *ANCHOR_DATE;
    if offset >= 0 {
        anchor.checked_add_days(Days::new(offset.unsigned_abs()))
    } else {
        anchor.checked_sub_days(Days::new(offset.unsigned_abs()))
    }
}

/// Puzzle an announcement posted at `posted_at` reports on: yesterday's.
pub fn announced_puzzle(posted_at: DateTime<Utc>) -> Option<i64> {
    let yesterday = posted_at.date_naive().checked_sub_days(Days::new(1))?;
    Some(puzzle_number_for(yesterday))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn anchor_round_trips() {
        let date = NaiveDate::from_ymd_opt(2022, 3, 5).unwrap();
        assert_eq!(puzzle_number_for(date), 259);
        assert_eq!(date_for_puzzle(259), Some(date));
    }

    #[test]
    fn counts_days_across_years() {
        let date = NaiveDate::from_ymd_opt(2023, 3, 5).unwrap();
        assert_eq!(puzzle_number_for(date), 259 + 365);
        assert_eq!(date_for_puzzle(0), NaiveDate::from_ymd_opt(2021, 6, 19));
    }

    #[test]
    fn announcement_refers_to_previous_day() {
        let posted_at = Utc.with_ymd_and_hms(2022, 3, 6, 8, 30, 0).unwrap();
        assert_eq!(announced_puzzle(posted_at), Some(259));
    }
}
