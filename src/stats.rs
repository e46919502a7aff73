use crate::date_key::{days_in_month, DateKey};
use crate::mood::MoodGrade;
use crate::store::Moods;
use chrono::{Duration, Months, NaiveDate};
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendRange {
    Week,
    Month,
    Year,
}

impl TrendRange {
    /// First day of the window that ends on `today`.
    pub fn start(self, today: NaiveDate) -> NaiveDate {
        match self {
            TrendRange::Week => days_before(today, 6),
            TrendRange::Month => days_before(today, 29),
            // Feb 29 clamps to Feb 28 of the previous year.
            TrendRange::Year => today
                .checked_sub_months(Months::new(12))
                .map_or(today, |year_ago| year_ago + Duration::days(1)),
        }
    }
}

fn days_before(today: NaiveDate, days: i64) -> NaiveDate {
    today
        .checked_sub_signed(Duration::days(days))
        .unwrap_or(NaiveDate::MIN)
}

impl FromStr for TrendRange {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "week" => Ok(TrendRange::Week),
            "month" => Ok(TrendRange::Month),
            "year" => Ok(TrendRange::Year),
            other => Err(format!("range must be 'week', 'month' or 'year', got '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeCount {
    pub grade: MoodGrade,
    pub count: u32,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub total: u32,
    pub grades: Vec<GradeCount>,
}

impl YearSummary {
    pub fn count(&self, grade: MoodGrade) -> u32 {
        self.entry(grade).map_or(0, |entry| entry.count)
    }

    pub fn percent(&self, grade: MoodGrade) -> f64 {
        self.entry(grade).map_or(0.0, |entry| entry.percent)
    }

    fn entry(&self, grade: MoodGrade) -> Option<&GradeCount> {
        self.grades.iter().find(|entry| entry.grade == grade)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: DateKey,
    pub mood: Option<MoodGrade>,
    pub daily_score: i64,
    pub cumulative_score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvelopePoint {
    pub date: DateKey,
    pub best: f64,
    pub worst: f64,
}

/// Best/worst reference lines between the first and last tracked day of a trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendEnvelope {
    pub first_tracked: usize,
    pub last_tracked: usize,
    pub span_days: i64,
    pub anchor: i64,
    pub best_case: i64,
    pub worst_case: i64,
    pub lines: Vec<EnvelopePoint>,
}

impl TrendEnvelope {
    pub fn best_end(&self) -> i64 {
        self.anchor + self.best_case
    }

    pub fn worst_end(&self) -> i64 {
        self.anchor + self.worst_case
    }
}

pub fn year_summary(moods: &Moods, year: i32) -> YearSummary {
    let mut counts = [0u32; MoodGrade::ALL.len()];
    let mut total = 0u32;

    for month in 1..=12 {
        for day in 1..=days_in_month(year, month) {
            let Some(key) = DateKey::new(year, month, day) else {
                continue;
            };
            if let Some(grade) = moods.get(&key) {
                counts[grade_index(*grade)] += 1;
                total += 1;
            }
        }
    }

    let grades = MoodGrade::ALL
        .iter()
        .zip(counts)
        .map(|(&grade, count)| GradeCount {
            grade,
            count,
            percent: if total > 0 {
                f64::from(count) / f64::from(total) * 100.0
            } else {
                0.0
            },
        })
        .collect();

    YearSummary { year, total, grades }
}

/// One point per day of the window ending on `today`, oldest first.
/// Untracked days score 0.
pub fn trend(moods: &Moods, range: TrendRange, today: NaiveDate) -> Vec<TrendPoint> {
    let start = range.start(today);
    let mut points = Vec::with_capacity((today - start).num_days().max(0) as usize + 1);
    let mut cumulative = 0i64;

    for date in start.iter_days().take_while(|date| *date <= today) {
        // Days before year 1 have no key and are left out of the window.
        let Some(key) = DateKey::from_date(date) else {
            continue;
        };
        let mood = moods.get(&key).copied();
        let daily_score = mood.map_or(0, MoodGrade::score);
        cumulative += daily_score;
        points.push(TrendPoint {
            date: key,
            mood,
            daily_score,
            cumulative_score: cumulative,
        });
    }

    points
}

/// `None` when no point in `points` carries a mood.
pub fn trend_envelope(points: &[TrendPoint]) -> Option<TrendEnvelope> {
    let first_tracked = points.iter().position(|point| point.mood.is_some())?;
    let last_tracked = points.iter().rposition(|point| point.mood.is_some())?;

    let span_days = (last_tracked - first_tracked + 1) as i64;
    let anchor = points[first_tracked].cumulative_score;
    let best_case = span_days * MoodGrade::best().score();
    let worst_case = span_days * MoodGrade::worst().score();

    let steps = (last_tracked - first_tracked) as f64;
    let lines = points[first_tracked..=last_tracked]
        .iter()
        .enumerate()
        .map(|(offset, point)| {
            let progress = if steps == 0.0 { 1.0 } else { offset as f64 / steps };
            EnvelopePoint {
                date: point.date,
                best: anchor as f64 + best_case as f64 * progress,
                worst: anchor as f64 + worst_case as f64 * progress,
            }
        })
        .collect();

    Some(TrendEnvelope {
        first_tracked,
        last_tracked,
        span_days,
        anchor,
        best_case,
        worst_case,
        lines,
    })
}

fn grade_index(grade: MoodGrade) -> usize {
    MoodGrade::ALL
        .iter()
        .position(|candidate| *candidate == grade)
        .unwrap_or_default()
}
