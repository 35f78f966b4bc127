use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::NaiveDate;
use rps_srs::{ReviewCard, ReviewOutcome};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, calendar::resolve_today, error::ApiError, metrics};

/// Create the review routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/users/{user_id}/review/due", get(get_due_cards))
        .route("/users/{user_id}/review/{item_id}", post(submit_review))
}

#[derive(Debug, Default, Deserialize)]
struct DueQuery {
    today: Option<NaiveDate>,
    /// Cap on the number of cards returned; `total` still counts all of them
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DueCardsResponse {
    today: NaiveDate,
    total: usize,
    cards: Vec<ReviewCard>,
}

/// Cards due on `today` or earlier, in the order they were created
async fn get_due_cards(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<DueQuery>,
) -> Result<Json<DueCardsResponse>, ApiError> {
    let today = resolve_today(query.today);
    let progress = state
        .read_progress(user_id, |progress| progress.load_progress())
        .await?;

    let due = progress.due_cards(today);
    let total = due.len();
    let cards = due
        .into_iter()
        .take(query.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();

    Ok(Json(DueCardsResponse { today, total, cards }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewSubmission {
    correct: bool,
    today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewResponse {
    /// `false` when no card tracks the item; nothing was changed then
    reviewed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<ReviewOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    card: Option<ReviewCard>,
}

/// Record one flashcard answer and count the day towards the streak
async fn submit_review(
    State(state): State<ApiState>,
    Path((user_id, item_id)): Path<(Uuid, String)>,
    Json(payload): Json<ReviewSubmission>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let today = resolve_today(payload.today);
    let correct = payload.correct;

    let (outcome, card) = state
        .write_progress(user_id, {
            let item_id = item_id.clone();
            move |progress| {
                progress.update(|p| {
                    let outcome = p.review_card(&item_id, correct, today);
                    p.update_streak(today);
                    (outcome, p.card(&item_id).cloned())
                })
            }
        })
        .await?;

    match &outcome {
        Some(o) => {
            metrics::record_review(o.correct);
            tracing::debug!(
                %user_id,
                item_id = %item_id,
                from = o.previous_box.get(),
                to = o.new_box.get(),
                next_review = %o.next_review_date,
                "Card reviewed"
            );
        }
        None => tracing::debug!(%user_id, item_id = %item_id, "Review for untracked item ignored"),
    }

    Ok(Json(ReviewResponse {
        reviewed: outcome.is_some(),
        outcome,
        card,
    }))
}
