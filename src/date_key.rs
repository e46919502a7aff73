use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Canonical identity of a calendar day, rendered as `YYYY-MM-DD`.
///
/// Months are 1-based. Only dates from year 1 onward are representable, and
/// only the zero-padded form parses, so a key always round-trips to the same
/// `(year, month, day)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date key `{0}`")]
pub struct InvalidDateKey(pub String);

impl DateKey {
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        if year < 1 {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn from_date(date: NaiveDate) -> Option<Self> {
        (date.year() >= 1).then_some(Self(date))
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    pub fn triple(self) -> (i32, u32, u32) {
        (self.year(), self.month(), self.day())
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

impl FromStr for DateKey {
    type Err = InvalidDateKey;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidDateKey(raw.to_string());
        let mut parts = raw.splitn(3, '-');
        let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if year.len() < 4 || month.len() != 2 || day.len() != 2 {
            return Err(invalid());
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(year) || !all_digits(month) || !all_digits(day) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let day: u32 = day.parse().map_err(|_| invalid())?;
        let key = Self::new(year, month, day).ok_or_else(invalid)?;

        // "02024-01-01" parses but is not the canonical spelling.
        if key.to_string() != raw {
            return Err(invalid());
        }
        Ok(key)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

pub fn to_key(year: i32, month: u32, day: u32) -> Option<DateKey> {
    DateKey::new(year, month, day)
}

pub fn from_key(key: &str) -> Result<(i32, u32, u32), InvalidDateKey> {
    key.parse::<DateKey>().map(DateKey::triple)
}

/// Gregorian day count for `month` (1-based) of `year`, or 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn is_today(year: i32, month: u32, day: u32) -> bool {
    is_today_at(year, month, day, today())
}

pub fn is_today_at(year: i32, month: u32, day: u32, now: NaiveDate) -> bool {
    now.year() == year && now.month() == month && now.day() == day
}

/// Offset of day 1 in a Monday-first week: 0 = Monday .. 6 = Sunday.
pub fn first_weekday_of_month(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|date| date.weekday().num_days_from_monday())
}

/// Moves `delta` months from `(year, month)`, carrying into the year.
/// `None` when the resulting year does not fit in an `i32`.
pub fn shift_month(year: i32, month: u32, delta: i32) -> Option<(i32, u32)> {
    let index = i64::from(year) * 12 + (i64::from(month) - 1) + i64::from(delta);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    Some((year, index.rem_euclid(12) as u32 + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips_every_day_of_a_leap_year() {
        for month in 1..=12 {
            for day in 1..=days_in_month(2024, month) {
                let key = to_key(2024, month, day).expect("valid date");
                assert_eq!(from_key(&key.to_string()), Ok((2024, month, day)));
            }
        }
    }

    #[test]
    fn key_round_trips_at_calendar_edges() {
        for (year, month, day) in [(1, 1, 1), (999, 12, 31), (9999, 12, 31), (2000, 2, 29)] {
            let key = to_key(year, month, day).unwrap();
            assert_eq!(key.triple(), (year, month, day));
            assert_eq!(from_key(&key.to_string()), Ok((year, month, day)));
        }
        assert_eq!(to_key(1, 1, 1).unwrap().to_string(), "0001-01-01");
    }

    #[test]
    fn key_is_zero_padded_and_one_based() {
        assert_eq!(to_key(2024, 1, 5).unwrap().to_string(), "2024-01-05");
        assert_eq!(to_key(2024, 12, 31).unwrap().to_string(), "2024-12-31");
    }

    #[test]
    fn rejects_non_canonical_and_impossible_keys() {
        for raw in ["2024-1-05", "2024-01-5", "2023-02-29", "2024-13-01", "0000-01-01", "02024-01-01", "2024/01/01", "", "2024-01-01x", "+2024-01-01"] {
            assert!(raw.parse::<DateKey>().is_err(), "{raw} should be rejected");
        }
        assert!(to_key(0, 1, 1).is_none());
        assert!(to_key(2023, 2, 29).is_none());
    }

    #[test]
    fn days_in_month_handles_leap_rules() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 12), 31);
        assert_eq!(days_in_month(2023, 13), 0);
    }

    #[test]
    fn is_today_compares_against_injected_now() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert!(is_today_at(2024, 3, 15, now));
        assert!(!is_today_at(2024, 3, 14, now));
        assert!(!is_today_at(2023, 3, 15, now));
    }

    #[test]
    fn first_weekday_is_monday_based() {
        // 2024-01-01 was a Monday, 2023-01-01 a Sunday.
        assert_eq!(first_weekday_of_month(2024, 1), Some(0));
        assert_eq!(first_weekday_of_month(2023, 1), Some(6));
        assert_eq!(first_weekday_of_month(2024, 2), Some(3));
        assert_eq!(first_weekday_of_month(2024, 0), None);
    }

    #[test]
    fn shift_month_carries_into_year() {
        assert_eq!(shift_month(2024, 12, 1), Some((2025, 1)));
        assert_eq!(shift_month(2024, 1, -1), Some((2023, 12)));
        assert_eq!(shift_month(2024, 6, 0), Some((2024, 6)));
        assert_eq!(shift_month(2024, 3, -27), Some((2021, 12)));
    }

    #[test]
    fn shift_month_rejects_years_out_of_range() {
        assert_eq!(shift_month(i32::MAX, 12, 1), None);
        assert_eq!(shift_month(i32::MIN, 1, -1), None);
        assert_eq!(shift_month(i32::MAX, 11, 1), Some((i32::MAX, 12)));
    }

    #[test]
    fn serializes_as_plain_string() {
        let key = to_key(2024, 2, 9).unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-02-09\"");
        let parsed: DateKey = serde_json::from_str("\"2024-02-09\"").unwrap();
        assert_eq!(parsed, key);
    }
}
