use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use chrono::{NaiveDate, Utc};
use rps_store::{NewQuizResult, QuizResult};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    ApiState,
    calendar::{quiz_timestamp, resolve_today},
    error::ApiError,
    metrics,
    validation::validate_quiz_result,
};

/// Create the quiz routes
pub fn routes() -> Router<ApiState> {
    Router::new().route("/users/{user_id}/quiz-results", post(save_quiz_result))
}

#[derive(Deserialize)]
struct QuizSubmission {
    #[serde(flatten)]
    result: NewQuizResult,
    today: Option<NaiveDate>,
}

/// Store a finished quiz and count the day towards the streak
async fn save_quiz_result(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<QuizSubmission>,
) -> Result<(StatusCode, Json<QuizResult>), ApiError> {
    validate_quiz_result(&payload.result)?;
    let today = resolve_today(payload.today);
    let taken_at = quiz_timestamp(payload.today, Utc::now());
    let result = payload.result;

    let saved = state
        .write_progress(user_id, move |progress| {
            progress.update(|p| {
                let saved = p.add_quiz_result(result, taken_at).clone();
                p.update_streak(today);
                saved
            })
        })
        .await?;

    metrics::record_quiz_result();
    tracing::debug!(%user_id, score = saved.score_percent(), "Quiz result saved");

    Ok((StatusCode::CREATED, Json(saved)))
}
