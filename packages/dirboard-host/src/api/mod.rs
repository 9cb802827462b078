use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

mod board;
mod events;

use crate::state::AppState;

/// Axum REST API routes.
///
///   GET  /status                    -> health check
///   GET  /boards                    -> configured boards
///   GET  /boards/{boardId}          -> latest pushed board snapshot
///   POST /boards/{boardId}/intents  -> queue an intent for the board session
///   GET  /boards/{boardId}/events   -> SSE stream of board snapshots
///   GET  /logs                      -> recent log entries
///   GET  /logs/stream               -> SSE stream of log entries
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/status", get(events::status))
        .route("/boards", get(board::list_boards))
        .route("/boards/{board_id}", get(board::get_board))
        .route("/boards/{board_id}/intents", post(board::post_intent))
        .route("/boards/{board_id}/events", get(events::board_events))
        .route("/logs", get(events::list_logs))
        .route("/logs/stream", get(events::stream_logs))
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, target: &'static str, error: String) -> ApiError {
    log_api_issue(status, target, &error);
    (status, Json(ErrorResponse { error }))
}

fn log_api_issue(status: StatusCode, target: &'static str, message: impl AsRef<str>) {
    let message = message.as_ref();
    if status.is_server_error() {
        log::error!(target: target, "{}", message);
    } else {
        log::warn!(target: target, "{}", message);
    }
}
