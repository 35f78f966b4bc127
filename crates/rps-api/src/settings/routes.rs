use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use rps_store::AppSettings;
use uuid::Uuid;

use crate::{ApiState, error::ApiError, validation::validate_settings};

/// Create the settings routes
pub fn routes() -> Router<ApiState> {
    Router::new().route(
        "/users/{user_id}/settings",
        get(get_settings).put(update_settings),
    )
}

async fn get_settings(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AppSettings>, ApiError> {
    let settings = state
        .read_progress(user_id, |progress| progress.load_settings())
        .await?;
    Ok(Json(settings))
}

async fn update_settings(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
    Json(settings): Json<AppSettings>,
) -> Result<Json<AppSettings>, ApiError> {
    validate_settings(&settings)?;

    let settings = state
        .write_progress(user_id, move |progress| {
            progress.save_settings(&settings).map(|()| settings)
        })
        .await?;

    Ok(Json(settings))
}
