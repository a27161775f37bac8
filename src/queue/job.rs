use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::errors::{EngineError, Result};

/// The finite set of job states.
///
/// A job is born [`JobStatus::Queued`] and is removed once it reaches
/// [`JobStatus::Complete`] or [`JobStatus::Failed`] and ages out of its
/// `keep_minutes` window, or is deleted explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Inprogress,
    Complete,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Inprogress => "inprogress",
            JobStatus::Complete => "complete",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "queued" => Ok(Self::Queued),
            "inprogress" => Ok(Self::Inprogress),
            "complete" => Ok(Self::Complete),
            "failed" => Ok(Self::Failed),
            other => Err(EngineError::InvalidArgument(format!(
                "invalid job status: {other}"
            ))),
        }
    }
}

pub const MIN_PRIORITY: i32 = 0;
pub const MAX_PRIORITY: i32 = 100;

/// A unit of work within a queue.
///
/// `content` is opaque to the controller - it is a free-form JSON value the
/// client attaches and later reads back; nothing here interprets it.
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct Job {
    #[builder(default = Uuid::new_v4().to_string())]
    pub uid: String,

    #[builder(default = serde_json::Value::Null)]
    pub content: serde_json::Value,

    #[builder(default = JobStatus::Queued)]
    pub state: JobStatus,

    pub priority: i32,

    #[builder(default)]
    pub created: i64,

    #[builder(default)]
    pub last_updated: i64,

    #[builder(default)]
    pub timeout_time: i64,

    #[builder(default)]
    pub keep_minutes: i64,

    #[builder(default)]
    pub timeout_minutes: i64,
}

impl Job {
    /// Validate the fields a client may set directly on insert.
    ///
    /// `uid`, `state`, `created` and `last_updated` are controller-assigned
    /// and are not part of this check.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority) {
            return Err(EngineError::InvalidArgument(format!(
                "priority {} out of range [{MIN_PRIORITY},{MAX_PRIORITY}]",
                self.priority
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_json() {
        for status in [
            JobStatus::Queued,
            JobStatus::Inprogress,
            JobStatus::Complete,
            JobStatus::Failed,
        ] {
            let encoded = serde_json::to_string(&status).unwrap();
            let decoded: JobStatus = serde_json::from_str(&encoded).unwrap();
            assert_eq!(status, decoded);
        }
    }

    #[test]
    fn status_json_matches_wire_spelling() {
        assert_eq!(serde_json::to_string(&JobStatus::Inprogress).unwrap(), "\"inprogress\"");
        assert_eq!(serde_json::to_string(&JobStatus::Queued).unwrap(), "\"queued\"");
    }

    #[test]
    fn from_str_accepts_any_case() {
        assert_eq!("INPROGRESS".parse::<JobStatus>().unwrap(), JobStatus::Inprogress);
        assert!("bogus".parse::<JobStatus>().is_err());
    }

    #[test]
    fn priority_out_of_range_rejected() {
        let job = Job::builder().priority(101).build();
        assert!(job.validate().is_err());
        let job = Job::builder().priority(-1).build();
        assert!(job.validate().is_err());
    }

    #[test]
    fn priority_in_range_accepted() {
        let job = Job::builder().priority(50).build();
        assert!(job.validate().is_ok());
    }
}
