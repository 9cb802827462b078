use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use dirboard_core::{BoardMessage, Intent};

use super::{api_error, ApiError};
use crate::state::{AppState, BoardRuntime};

fn runtime<'a>(
    state: &'a AppState,
    board_id: &str,
    target: &'static str,
) -> Result<&'a BoardRuntime, ApiError> {
    state.boards.get(board_id).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            target,
            format!("Board not found: {}", board_id),
        )
    })
}

pub async fn list_boards(State(state): State<AppState>) -> Json<serde_json::Value> {
    let boards: Vec<_> = state.boards.values().map(BoardRuntime::summary).collect();
    Json(serde_json::json!({ "boards": boards }))
}

pub async fn get_board(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> Result<Json<BoardMessage>, ApiError> {
    let runtime = runtime(&state, &board_id, "dirboard.api.get_board")?;
    runtime.presenter.latest().map(Json).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            "dirboard.api.get_board",
            format!("Board {} has not been built yet", board_id),
        )
    })
}

/// Queue an intent for the board's session. Unknown intent types are
/// accepted and dropped by the session.
pub async fn post_intent(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
    Json(intent): Json<Intent>,
) -> Result<StatusCode, ApiError> {
    let runtime = runtime(&state, &board_id, "dirboard.api.post_intent")?;
    runtime.intents.send(intent).map_err(|_| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "dirboard.api.post_intent",
            format!("Board session {} is closed", board_id),
        )
    })?;
    Ok(StatusCode::ACCEPTED)
}
