use crate::date_key::DateKey;
use crate::mood::{MoodGrade, Rgb};
use crate::stats::{TrendEnvelope, TrendPoint, TrendRange};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct MoodRequest {
    pub grade: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub date: DateKey,
    pub mood: Option<MoodGrade>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub range: TrendRange,
    pub today: DateKey,
    pub points: Vec<TrendPoint>,
    pub envelope: Option<TrendEnvelope>,
}

#[derive(Debug, Serialize)]
pub struct VocabularyEntry {
    pub grade: MoodGrade,
    pub label: &'static str,
    pub color: Rgb,
    pub score: i64,
}

impl From<MoodGrade> for VocabularyEntry {
    fn from(grade: MoodGrade) -> Self {
        Self {
            grade,
            label: grade.label(),
            color: grade.color(),
            score: grade.score(),
        }
    }
}
