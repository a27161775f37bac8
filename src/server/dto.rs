//! Request/response bodies for the HTTP API. These are the only place the
//! wire shape is allowed to diverge from the internal [`crate::queue`] types,
//! and the only place the API's inconsistent field naming (`name` for
//! queues, `queueName`/`jobUID` for jobs) is allowed to show up - it mirrors
//! the query-parameter names this surface has always used.

use serde::{Deserialize, Serialize};

use crate::queue::{Job, JobStatus, QueueRecord};

#[derive(Debug, Deserialize)]
pub struct CreateQueueRequest {
    pub name: String,
    pub access_key: String,
}

#[derive(Debug, Deserialize)]
pub struct QueueNameQuery {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct QueueResponse {
    pub name: String,
    pub size: usize,
    pub jobs: Vec<Job>,
}

impl From<QueueRecord> for QueueResponse {
    fn from(record: QueueRecord) -> Self {
        Self {
            name: record.name,
            size: record.size,
            jobs: record.jobs,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewJob {
    #[serde(default)]
    pub content: serde_json::Value,
    pub priority: i32,
    #[serde(default)]
    pub timeout_minutes: i64,
    #[serde(default)]
    pub keep_minutes: i64,
    #[serde(default)]
    pub timeout_time: i64,
}

#[derive(Debug, Deserialize)]
pub struct AddJobRequest {
    pub queue_name: String,
    pub job: NewJob,
}

#[derive(Debug, Deserialize)]
pub struct JobLookupQuery {
    #[serde(rename = "queueName")]
    pub queue_name: String,
    #[serde(rename = "jobUID")]
    pub job_uid: String,
}

#[derive(Debug, Deserialize)]
pub struct GetNextJobQuery {
    #[serde(rename = "queueName")]
    pub queue_name: String,
    /// Accepted for API compatibility; has no effect. `GetNextJob` never
    /// reserves the job it returns - see [`crate::queue::Controller::get_next_job`].
    #[serde(rename = "markQueued", default)]
    pub mark_queued: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobStatusRequest {
    pub queue_name: String,
    pub uid: String,
    pub new_status: JobStatus,
}

#[derive(Debug, Serialize)]
pub struct StatusOk {
    pub status: &'static str,
}

impl StatusOk {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}
