// src/server/handlers.rs

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{error, info};

use crate::engine::DispatchResponse;
use crate::params::RawRequest;

use super::state::AppState;

/// `POST /{key}`: run every task of the hook.
pub async fn run_hook(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    dispatch(state, key, None, RawRequest::new(headers, body)).await
}

/// `POST /{key}/{task}`: run only the named task.
pub async fn run_hook_task(
    State(state): State<AppState>,
    Path((key, task)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    dispatch(state, key, Some(task), RawRequest::new(headers, body)).await
}

/// Dispatch on a separate tokio task so a client that hangs up does not
/// abort steps that are already running.
async fn dispatch(
    state: AppState,
    key: String,
    task: Option<String>,
    request: RawRequest,
) -> Response {
    let dispatcher = state.dispatcher.clone();
    let handle = tokio::spawn(async move {
        dispatcher
            .handle(&key, task.as_deref(), &request)
            .await
    });

    match handle.await {
        Ok(response) => respond(response),
        Err(err) => {
            error!(error = %err, "dispatch task panicked");
            (StatusCode::INTERNAL_SERVER_ERROR, String::new()).into_response()
        }
    }
}

fn respond(response: DispatchResponse) -> Response {
    if response.status == StatusCode::OK {
        info!(status = response.status.as_u16(), "RESPONSE");
    } else {
        error!(
            status = response.status.as_u16(),
            body = %response.body,
            "RESPONSE"
        );
    }

    (response.status, response.body).into_response()
}
