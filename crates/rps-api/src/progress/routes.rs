use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::NaiveDate;
use rps_store::{BoxCount, QuizResult};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    ApiState,
    calendar::{DateQuery, resolve_today},
    error::ApiError,
};

/// Number of quizzes listed in the progress summary
const RECENT_QUIZZES: usize = 5;

/// Create the progress routes
pub fn routes() -> Router<ApiState> {
    Router::new().route(
        "/users/{user_id}/progress",
        get(get_progress).delete(reset_progress),
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressSummary {
    day_streak: u32,
    last_practice_date: Option<NaiveDate>,
    lessons_completed: Vec<String>,
    total_reviews: u64,
    total_correct: u64,
    /// Percent, rounded
    accuracy: u32,
    total_cards: usize,
    mastered_cards: usize,
    due_today: usize,
    boxes: Vec<BoxCount>,
    recent_quizzes: Vec<QuizResult>,
}

async fn get_progress(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<DateQuery>,
) -> Result<Json<ProgressSummary>, ApiError> {
    let today = resolve_today(query.today);
    let progress = state
        .read_progress(user_id, |progress| progress.load_progress())
        .await?;

    Ok(Json(ProgressSummary {
        day_streak: progress.day_streak,
        last_practice_date: progress.last_practice_date,
        lessons_completed: progress.lessons_completed.clone(),
        total_reviews: progress.total_reviews,
        total_correct: progress.total_correct,
        accuracy: progress.accuracy_percent(),
        total_cards: progress.review_cards.len(),
        mastered_cards: progress.mastered_count(),
        due_today: progress.due_cards(today).len(),
        boxes: progress.box_counts(),
        recent_quizzes: progress
            .recent_quiz_results(RECENT_QUIZZES)
            .into_iter()
            .cloned()
            .collect(),
    }))
}

/// Delete all progress and settings for the user
async fn reset_progress(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .write_progress(user_id, |progress| progress.reset())
        .await?;

    tracing::info!(%user_id, "User data reset");
    Ok(StatusCode::NO_CONTENT)
}
