use serde::{Deserialize, Serialize};

use super::job::Job;

/// A named, priority-ordered, access-controlled sequence of jobs.
///
/// `jobs` is maintained priority-descending by the controller; ties resolve
/// to insertion order. `size` mirrors `jobs.len()` and is kept in sync by
/// every mutation so readers get an O(1) count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueRecord {
    pub name: String,
    pub access_key_hash: String,
    pub size: usize,
    pub jobs: Vec<Job>,
}

impl QueueRecord {
    pub fn new(name: impl Into<String>, access_key_hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access_key_hash: access_key_hash.into(),
            size: 0,
            jobs: Vec::new(),
        }
    }

    /// Stable sort by priority descending; equal-priority jobs keep their
    /// relative (insertion) order.
    pub fn resort(&mut self) {
        self.jobs.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    pub fn sync_size(&mut self) {
        self.size = self.jobs.len();
    }
}
