use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    ApiState, calendar::resolve_today, error::ApiError, metrics, validation::validate_item_ids,
};

/// Create the lesson routes
pub fn routes() -> Router<ApiState> {
    Router::new().route(
        "/users/{user_id}/lessons/{lesson_id}/complete",
        post(complete_lesson),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompleteLessonRequest {
    /// Items of the lesson, in lesson order
    item_ids: Vec<String>,
    today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompleteLessonResponse {
    lesson_id: String,
    cards_created: usize,
    total_cards: usize,
    lessons_completed: usize,
    day_streak: u32,
}

async fn complete_lesson(
    State(state): State<ApiState>,
    Path((user_id, lesson_id)): Path<(Uuid, String)>,
    Json(payload): Json<CompleteLessonRequest>,
) -> Result<Json<CompleteLessonResponse>, ApiError> {
    validate_item_ids(&payload.item_ids)?;
    let today = resolve_today(payload.today);

    let item_ids = payload.item_ids;
    let completed = state
        .write_progress(user_id, {
            let lesson_id = lesson_id.clone();
            move |progress| progress.complete_lesson(&lesson_id, &item_ids, today)
        })
        .await?;

    metrics::record_lesson_completed(completed.cards_created);

    let progress = completed.progress;
    Ok(Json(CompleteLessonResponse {
        lesson_id,
        cards_created: completed.cards_created,
        total_cards: progress.review_cards.len(),
        lessons_completed: progress.lessons_completed.len(),
        day_streak: progress.day_streak,
    }))
}
