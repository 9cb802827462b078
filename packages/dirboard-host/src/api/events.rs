use axum::{
    extract::{Path, Query, State},
    response::{
        sse::{Event, KeepAlive},
        Json, Sse,
    },
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use super::{api_error, ApiError};
use crate::state::AppState;

fn sse_event<T: Serialize>(payload: &T) -> Option<Result<Event, Infallible>> {
    match serde_json::to_string(payload) {
        Ok(json) => Some(Ok(Event::default().data(json))),
        Err(e) => {
            log::warn!("[dirboard.api.sse] Failed to encode event: {}", e);
            None
        }
    }
}

fn keep_alive() -> KeepAlive {
    KeepAlive::new()
        .interval(Duration::from_secs(30))
        .text("keep-alive")
}

/// SSE endpoint: the latest board snapshot, then every snapshot the session
/// pushes. Lagging clients skip to the next snapshot. The stream ends when
/// the server shuts down.
pub async fn board_events(
    State(state): State<AppState>,
    Path(board_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let runtime = state.boards.get(&board_id).ok_or_else(|| {
        api_error(
            axum::http::StatusCode::NOT_FOUND,
            "dirboard.api.board_events",
            format!("Board not found: {}", board_id),
        )
    })?;

    let rx = runtime.presenter.subscribe();
    let initial = tokio_stream::iter(runtime.presenter.latest()).filter_map(|m| sse_event(&m));
    let updates = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(message) => sse_event(&message),
        Err(e) => {
            log::debug!("[dirboard.api.sse] Client lagged: {}", e);
            None
        }
    });

    let stream = futures_util::StreamExt::take_until(
        initial.chain(updates),
        state.shutdown_requested(),
    );
    Ok(Sse::new(stream).keep_alive(keep_alive()))
}

pub async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "running",
        "port": state.port,
        "bindAddress": state.bind_address,
        "boards": state.boards.len(),
    }))
}

#[derive(Deserialize)]
pub struct LogQuery {
    limit: Option<usize>,
}

pub async fn list_logs(Query(query): Query<LogQuery>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "entries": crate::log_bridge::recent(query.limit),
    }))
}

pub async fn stream_logs(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = crate::log_bridge::subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|item| match item {
        Ok(entry) => sse_event(&entry),
        Err(_) => None,
    });
    let stream = futures_util::StreamExt::take_until(stream, state.shutdown_requested());
    Sse::new(stream).keep_alive(keep_alive())
}
