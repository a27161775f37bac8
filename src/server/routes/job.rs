use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::errors::EngineError;
use crate::queue::Job;
use crate::server::app::AppState;
use crate::server::dto::{AddJobRequest, GetNextJobQuery, JobLookupQuery, StatusOk, UpdateJobStatusRequest};
use crate::server::middleware::extract_access_key;

pub async fn add_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AddJobRequest>,
) -> Result<(StatusCode, Json<Job>), EngineError> {
    let access_key = extract_access_key(&headers)?;

    let job = Job::builder()
        .content(body.job.content)
        .priority(body.job.priority)
        .timeout_minutes(body.job.timeout_minutes)
        .keep_minutes(body.job.keep_minutes)
        .timeout_time(body.job.timeout_time)
        .build();

    let job = state.add_job(job, &body.queue_name, &access_key, true)?;
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn get_job(
    State(state): State<AppState>,
    Query(params): Query<JobLookupQuery>,
    headers: HeaderMap,
) -> Result<Json<Job>, EngineError> {
    state.update_queue(&params.queue_name)?;

    let access_key = extract_access_key(&headers)?;
    let job = state.get_job(&params.job_uid, &params.queue_name, &access_key)?;
    Ok(Json(job))
}

/// Read-only: returns the first `queued` job without reserving it. The
/// `markQueued` query parameter is accepted for API compatibility but has
/// no effect - callers that want at-most-one delivery must follow up with
/// an explicit [`update_job_status`] call.
pub async fn get_next_job(
    State(state): State<AppState>,
    Query(params): Query<GetNextJobQuery>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Option<Job>>), EngineError> {
    state.update_queue(&params.queue_name)?;

    let access_key = extract_access_key(&headers)?;
    let job = state.get_next_job(&params.queue_name, &access_key)?;

    let status = if job.is_some() {
        StatusCode::OK
    } else {
        StatusCode::NO_CONTENT
    };
    Ok((status, Json(job)))
}

pub async fn update_job_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UpdateJobStatusRequest>,
) -> Result<Json<StatusOk>, EngineError> {
    let access_key = extract_access_key(&headers)?;
    state.update_job_status(&body.uid, body.new_status, &body.queue_name, &access_key)?;
    Ok(Json(StatusOk::ok()))
}

pub async fn delete_job(
    State(state): State<AppState>,
    Query(params): Query<JobLookupQuery>,
    headers: HeaderMap,
) -> Result<StatusCode, EngineError> {
    let access_key = extract_access_key(&headers)?;
    state.delete_job(&params.job_uid, &params.queue_name, &access_key)?;
    Ok(StatusCode::NO_CONTENT)
}
