use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::errors::EngineError;
use crate::server::app::AppState;
use crate::server::dto::{CreateQueueRequest, QueueNameQuery, QueueResponse};
use crate::server::middleware::extract_access_key;

pub async fn create_queue(
    State(state): State<AppState>,
    Json(body): Json<CreateQueueRequest>,
) -> Result<StatusCode, EngineError> {
    state.create_queue(&body.name, &body.access_key)?;
    Ok(StatusCode::CREATED)
}

pub async fn get_queue(
    State(state): State<AppState>,
    Query(params): Query<QueueNameQuery>,
    headers: HeaderMap,
) -> Result<Json<QueueResponse>, EngineError> {
    // The maintenance sweep runs on every read, independent of whether the
    // access key below turns out to be valid.
    state.update_queue(&params.name)?;

    let access_key = extract_access_key(&headers)?;
    let queue = state.get_queue(&params.name, &access_key)?;
    Ok(Json(queue.into()))
}

pub async fn delete_queue(
    State(state): State<AppState>,
    Query(params): Query<QueueNameQuery>,
    headers: HeaderMap,
) -> Result<StatusCode, EngineError> {
    let access_key = extract_access_key(&headers)?;
    state.delete_queue(&params.name, &access_key)?;
    Ok(StatusCode::NO_CONTENT)
}
