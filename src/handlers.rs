use crate::calendar::{month_grid, year_grid, MonthGrid, YearGrid};
use crate::date_key::{today, DateKey};
use crate::errors::AppError;
use crate::import::{export_file_name, export_json, reconcile, ImportOutcome};
use crate::models::{DayResponse, MoodRequest, NoteRequest, TrendResponse, VocabularyEntry};
use crate::mood::MoodGrade;
use crate::state::AppState;
use crate::stats::{trend, trend_envelope, year_summary, TrendRange, YearSummary};
use crate::storage::FileBackend;
use crate::store::EntryStore;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};

pub async fn get_today(State(state): State<AppState>) -> Result<Json<DayResponse>, AppError> {
    let key = today_key()?;
    let store = state.store.lock().await;
    Ok(Json(day_response(&store, key)))
}

pub async fn get_vocabulary() -> Json<Vec<VocabularyEntry>> {
    Json(MoodGrade::ALL.into_iter().map(VocabularyEntry::from).collect())
}

pub async fn get_mood(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DayResponse>, AppError> {
    let key: DateKey = key.parse()?;
    let store = state.store.lock().await;
    Ok(Json(day_response(&store, key)))
}

pub async fn set_mood(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(payload): Json<MoodRequest>,
) -> Result<Json<DayResponse>, AppError> {
    let key: DateKey = key.parse()?;
    let grade = parse_grade(&payload.grade)?;
    let response = state
        .write(move |store| {
            store.set_mood(key, Some(grade));
            day_response(store, key)
        })
        .await?;
    Ok(Json(response))
}

pub async fn clear_mood(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DayResponse>, AppError> {
    let key: DateKey = key.parse()?;
    let response = state
        .write(move |store| {
            store.clear_mood(key);
            day_response(store, key)
        })
        .await?;
    Ok(Json(response))
}

pub async fn toggle_mood(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(payload): Json<MoodRequest>,
) -> Result<Json<DayResponse>, AppError> {
    let key: DateKey = key.parse()?;
    let grade = parse_grade(&payload.grade)?;
    let response = state
        .write(move |store| {
            store.toggle_mood(key, grade);
            day_response(store, key)
        })
        .await?;
    Ok(Json(response))
}

pub async fn get_note(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DayResponse>, AppError> {
    let key: DateKey = key.parse()?;
    let store = state.store.lock().await;
    Ok(Json(day_response(&store, key)))
}

pub async fn set_note(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(payload): Json<NoteRequest>,
) -> Result<Json<DayResponse>, AppError> {
    let key: DateKey = key.parse()?;
    let response = state
        .write(move |store| {
            store.set_note(key, &payload.text);
            day_response(store, key)
        })
        .await?;
    Ok(Json(response))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<YearSummary>, AppError> {
    let store = state.store.lock().await;
    Ok(Json(year_summary(store.moods(), year)))
}

pub async fn get_trend(
    State(state): State<AppState>,
    Path(range): Path<String>,
) -> Result<Json<TrendResponse>, AppError> {
    let range: TrendRange = range.parse().map_err(AppError::bad_request)?;
    let today_key = today_key()?;
    let store = state.store.lock().await;
    let points = trend(store.moods(), range, today_key.date());
    let envelope = trend_envelope(&points);

    Ok(Json(TrendResponse {
        range,
        today: today_key,
        points,
        envelope,
    }))
}

pub async fn get_year_grid(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<YearGrid>, AppError> {
    let store = state.store.lock().await;
    year_grid(&*store, year, today())
        .map(Json)
        .ok_or_else(|| AppError::bad_request(format!("no calendar for year {year}")))
}

pub async fn get_month_grid(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<MonthGrid>, AppError> {
    let store = state.store.lock().await;
    month_grid(&*store, year, month, today())
        .map(Json)
        .ok_or_else(|| AppError::bad_request(format!("no calendar for {year}-{month}")))
}

pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let store = state.store.lock().await;
    let body = export_json(&*store).map_err(AppError::internal)?;
    let disposition = format!("attachment; filename=\"{}\"", export_file_name(today()));

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

pub async fn import(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImportOutcome>, AppError> {
    let outcome = state.write(move |store| reconcile(store, &body)).await??;
    Ok(Json(outcome))
}

fn parse_grade(raw: &str) -> Result<MoodGrade, AppError> {
    MoodGrade::parse(raw.trim())
        .ok_or_else(|| AppError::bad_request(format!("unknown mood grade '{raw}'")))
}

fn today_key() -> Result<DateKey, AppError> {
    DateKey::from_date(today()).ok_or_else(|| AppError::bad_request("system clock is before year 1"))
}

fn day_response(store: &EntryStore<FileBackend>, key: DateKey) -> DayResponse {
    DayResponse {
        date: key,
        mood: store.get_mood(key),
        note: store.get_note(key).map(str::to_string),
    }
}
