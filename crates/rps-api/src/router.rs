use axum::{Router, http::StatusCode, middleware, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    error::ApiError, lesson, metrics, middleware::request_id::request_id_middleware, progress,
    quiz, review, settings, state::ApiState,
};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics_handler))
        .merge(lesson::routes())
        .merge(review::routes())
        .merge(progress::routes())
        .merge(quiz::routes())
        .merge(settings::routes())
        .route_layer(middleware::from_fn(metrics::track_metrics))
        .fallback(handler_404)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> ApiError {
    ApiError::NotFound("The requested resource was not found".to_string())
}
