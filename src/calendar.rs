//! Month and year grid layouts derived from the entry store.

use crate::date_key::{days_in_month, first_weekday_of_month, is_today_at, DateKey};
use crate::mood::MoodGrade;
use crate::storage::Backend;
use crate::store::EntryStore;
use chrono::NaiveDate;
use serde::Serialize;

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Rows in the year grid, one per possible day of month.
pub const YEAR_GRID_ROWS: u32 = 31;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub key: DateKey,
    pub day: u32,
    pub mood: Option<MoodGrade>,
    pub has_note: bool,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub weekday_labels: [&'static str; 7],
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearGrid {
    pub year: i32,
    pub month_labels: [&'static str; 12],
    /// `rows[day - 1][month - 1]`; `None` where the day does not exist.
    pub rows: Vec<Vec<Option<DayCell>>>,
}

impl YearGrid {
    pub fn cell(&self, month: u32, day: u32) -> Option<&DayCell> {
        let row = self.rows.get(day.checked_sub(1)? as usize)?;
        row.get(month.checked_sub(1)? as usize)?.as_ref()
    }
}

/// `None` for an invalid month or a year before 1.
pub fn month_grid<B: Backend>(
    store: &EntryStore<B>,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Option<MonthGrid> {
    let leading_blanks = first_weekday_of_month(year, month)?;
    let days = (1..=days_in_month(year, month))
        .map(|day| day_cell(store, year, month, day, today))
        .collect::<Option<Vec<_>>>()?;

    Some(MonthGrid {
        year,
        month,
        title: format!("{} {year}", month_name(month)),
        weekday_labels: WEEKDAY_LABELS,
        leading_blanks,
        days,
    })
}

pub fn year_grid<B: Backend>(store: &EntryStore<B>, year: i32, today: NaiveDate) -> Option<YearGrid> {
    if year < 1 {
        return None;
    }
    let rows = (1..=YEAR_GRID_ROWS)
        .map(|day| {
            (1..=12)
                .map(|month| {
                    (day <= days_in_month(year, month))
                        .then(|| day_cell(store, year, month, day, today))
                        .flatten()
                })
                .collect()
        })
        .collect();

    Some(YearGrid {
        year,
        month_labels: MONTH_LABELS,
        rows,
    })
}

fn day_cell<B: Backend>(
    store: &EntryStore<B>,
    year: i32,
    month: u32,
    day: u32,
    today: NaiveDate,
) -> Option<DayCell> {
    let key = DateKey::new(year, month, day)?;
    Some(DayCell {
        key,
        day,
        mood: store.get_mood(key),
        has_note: store.has_note(key),
        is_today: is_today_at(year, month, day, today),
    })
}

fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ];
    NAMES[(month as usize - 1) % 12]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;

    fn store() -> EntryStore<MemoryBackend> {
        let mut store = EntryStore::load(MemoryBackend::new());
        store.set_mood("2024-02-10".parse().unwrap(), Some(MoodGrade::B));
        store.set_note("2024-02-11".parse().unwrap(), "dinner with friends");
        store
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn month_grid_lays_out_leap_february() {
        let grid = month_grid(&store(), 2024, 2, date(2024, 2, 11)).unwrap();
        assert_eq!(grid.title, "February 2024");
        assert_eq!(grid.leading_blanks, 3);
        assert_eq!(grid.days.len(), 29);

        let tenth = &grid.days[9];
        assert_eq!(tenth.key.to_string(), "2024-02-10");
        assert_eq!(tenth.mood, Some(MoodGrade::B));
        assert!(!tenth.has_note);

        let eleventh = &grid.days[10];
        assert!(eleventh.has_note);
        assert!(eleventh.is_today);
        assert_eq!(grid.days.iter().filter(|cell| cell.is_today).count(), 1);
    }

    #[test]
    fn month_grid_rejects_invalid_month() {
        assert!(month_grid(&store(), 2024, 13, date(2024, 1, 1)).is_none());
        assert!(month_grid(&store(), 2024, 0, date(2024, 1, 1)).is_none());
    }

    #[test]
    fn year_grid_blanks_impossible_days() {
        let grid = year_grid(&store(), 2023, date(2023, 4, 30)).unwrap();
        assert_eq!(grid.rows.len(), 31);
        assert!(grid.rows.iter().all(|row| row.len() == 12));

        assert!(grid.cell(2, 28).is_some());
        assert!(grid.cell(2, 29).is_none());
        assert!(grid.cell(4, 31).is_none());
        assert!(grid.cell(12, 31).is_some());
        assert!(grid.cell(4, 30).unwrap().is_today);

        let existing = grid.rows.iter().flatten().filter(|cell| cell.is_some()).count();
        assert_eq!(existing, 365);
    }

    #[test]
    fn year_grid_reflects_store() {
        let grid = year_grid(&store(), 2024, date(2025, 1, 1)).unwrap();
        assert_eq!(grid.cell(2, 10).unwrap().mood, Some(MoodGrade::B));
        assert!(grid.cell(2, 11).unwrap().has_note);
        assert!(grid.cell(2, 29).is_some());
        assert!(grid.rows.iter().flatten().flatten().all(|cell| !cell.is_today));
    }
}
