use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/today", get(handlers::get_today))
        .route("/api/vocabulary", get(handlers::get_vocabulary))
        .route(
            "/api/moods/:key",
            get(handlers::get_mood)
                .put(handlers::set_mood)
                .delete(handlers::clear_mood),
        )
        .route("/api/moods/:key/toggle", post(handlers::toggle_mood))
        .route(
            "/api/notes/:key",
            get(handlers::get_note).put(handlers::set_note),
        )
        .route("/api/summary/:year", get(handlers::get_summary))
        .route("/api/trend/:range", get(handlers::get_trend))
        .route("/api/calendar/:year", get(handlers::get_year_grid))
        .route("/api/calendar/:year/:month", get(handlers::get_month_grid))
        .route("/api/export", get(handlers::export))
        .route("/api/import", post(handlers::import))
        .with_state(state)
}
