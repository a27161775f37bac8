//! The Query Controller - the only public mutator of the [`Store`].
//!
//! ```text
//! API handler
//!     │
//!     └─► Controller operation (acquires the store lock, mutates, unlocks)
//!             └─► signals dirty on a bounded channel
//!                     └─► Persistence Monitor drains, debounces, saves
//! ```
//!
//! Every operation below acquires the store's exclusive lock, does its work,
//! and releases it before returning - no operation suspends while holding
//! the lock, and no operation except [`Controller::update_queue`] skips the
//! access-key check.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;

use crate::crypto::hasher::{hash, HashAlgorithm};
use crate::errors::{EngineError, Result};

use super::job::{Job, JobStatus};
use super::record::QueueRecord;
use super::store::Store;

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs() as i64
}

fn require_non_empty(name: &str, field: &str) -> Result<()> {
    if name.is_empty() {
        return Err(EngineError::InvalidArgument(format!("{field} must not be empty")));
    }
    Ok(())
}

/// The concurrent in-memory state and the only component allowed to mutate it.
pub struct Controller {
    store: Mutex<Store>,
    dirty: mpsc::Sender<bool>,
}

impl Controller {
    /// Create a controller over a blank store.
    pub fn new(dirty: mpsc::Sender<bool>) -> Self {
        Self {
            store: Mutex::new(Store::new()),
            dirty,
        }
    }

    /// Create a controller pre-loaded from a store (used after snapshot load).
    pub fn from_store(store: Store, dirty: mpsc::Sender<bool>) -> Self {
        Self {
            store: Mutex::new(store),
            dirty,
        }
    }

    /// Non-blocking dirty signal. The single-slot inbox means bursts of
    /// mutations between saves coalesce into at most one pending save; if
    /// the slot is already full we drop the send rather than block.
    fn signal_dirty(&self) {
        let _ = self.dirty.try_send(true);
    }

    /// Deep-copy the whole store for the snapshot pipeline. Callers outside
    /// persistence should prefer [`Controller::get_queue`].
    pub fn snapshot(&self) -> Store {
        self.store.lock().expect("store lock poisoned").clone()
    }

    /// Replace the store wholesale (used when loading a snapshot at startup).
    pub fn replace_store(&self, mut store: Store) {
        for queue in store.queues.values_mut() {
            queue.resort();
            queue.sync_size();
        }
        *self.store.lock().expect("store lock poisoned") = store;
    }

    fn check_access(queue: &QueueRecord, access_key: &str) -> Result<()> {
        let hashed = hash(HashAlgorithm::Md5, access_key)?;
        if hashed != queue.access_key_hash {
            return Err(EngineError::Unauthorized);
        }
        Ok(())
    }

    pub fn create_queue(&self, name: &str, access_key: &str) -> Result<()> {
        require_non_empty(name, "name")?;
        require_non_empty(access_key, "access_key")?;
        let hashed = hash(HashAlgorithm::Md5, access_key)?;

        let mut store = self.store.lock().expect("store lock poisoned");
        if store.queues.contains_key(name) {
            return Err(EngineError::Conflict(name.to_string()));
        }
        store.queues.insert(name.to_string(), QueueRecord::new(name, hashed));
        drop(store);

        self.signal_dirty();
        Ok(())
    }

    /// Returns a deep-copy snapshot of the queue; no internal references escape the lock.
    pub fn get_queue(&self, name: &str, access_key: &str) -> Result<QueueRecord> {
        require_non_empty(name, "name")?;
        require_non_empty(access_key, "access_key")?;

        let store = self.store.lock().expect("store lock poisoned");
        let queue = store
            .queues
            .get(name)
            .ok_or_else(|| EngineError::NotFound(format!("queue {name}")))?;
        Self::check_access(queue, access_key)?;
        Ok(queue.clone())
    }

    pub fn delete_queue(&self, name: &str, access_key: &str) -> Result<()> {
        require_non_empty(name, "name")?;
        require_non_empty(access_key, "access_key")?;

        let mut store = self.store.lock().expect("store lock poisoned");
        let queue = store
            .queues
            .get(name)
            .ok_or_else(|| EngineError::NotFound(format!("queue {name}")))?;
        Self::check_access(queue, access_key)?;
        store.queues.remove(name);
        drop(store);

        self.signal_dirty();
        Ok(())
    }

    /// Appends `job` to `queue`. If `resort` is set, the queue is
    /// stable-resorted by priority descending immediately after the
    /// insert; otherwise the caller is responsible for a later
    /// [`Controller::update_queue`] (or another `add_job` with
    /// `resort=true`) to restore ordering - a fast path for bulk loads.
    pub fn add_job(&self, mut job: Job, queue_name: &str, access_key: &str, resort: bool) -> Result<Job> {
        require_non_empty(queue_name, "queue")?;
        require_non_empty(access_key, "access_key")?;
        job.validate()?;

        let mut store = self.store.lock().expect("store lock poisoned");
        let queue = store
            .queues
            .get_mut(queue_name)
            .ok_or_else(|| EngineError::NotFound(format!("queue {queue_name}")))?;
        Self::check_access(queue, access_key)?;

        let created = now();
        job.created = created;
        job.last_updated = created;
        job.state = JobStatus::Queued;
        if job.uid.is_empty() {
            job.uid = uuid::Uuid::new_v4().to_string();
        }

        queue.jobs.push(job.clone());
        if resort {
            queue.resort();
        }
        queue.sync_size();
        drop(store);

        self.signal_dirty();
        Ok(job)
    }

    pub fn get_job(&self, uid: &str, queue_name: &str, access_key: &str) -> Result<Job> {
        require_non_empty(uid, "uid")?;
        require_non_empty(queue_name, "queue")?;
        require_non_empty(access_key, "access_key")?;

        let store = self.store.lock().expect("store lock poisoned");
        let queue = store
            .queues
            .get(queue_name)
            .ok_or_else(|| EngineError::NotFound(format!("queue {queue_name}")))?;
        Self::check_access(queue, access_key)?;

        queue
            .jobs
            .iter()
            .find(|j| j.uid == uid)
            .cloned()
            .ok_or_else(|| EngineError::NotFound(format!("job {uid}")))
    }

    /// Returns the first `queued` job in priority order, or `None` if there
    /// isn't one. Does not reserve the job - see [`Controller::update_job_status`]
    /// for moving it to `inprogress`. This makes delivery at-least-once.
    pub fn get_next_job(&self, queue_name: &str, access_key: &str) -> Result<Option<Job>> {
        require_non_empty(queue_name, "queue")?;
        require_non_empty(access_key, "access_key")?;

        let store = self.store.lock().expect("store lock poisoned");
        let queue = store
            .queues
            .get(queue_name)
            .ok_or_else(|| EngineError::NotFound(format!("queue {queue_name}")))?;
        Self::check_access(queue, access_key)?;

        Ok(queue.jobs.iter().find(|j| j.state == JobStatus::Queued).cloned())
    }

    pub fn update_job_status(
        &self,
        uid: &str,
        new_status: JobStatus,
        queue_name: &str,
        access_key: &str,
    ) -> Result<()> {
        require_non_empty(uid, "uid")?;
        require_non_empty(queue_name, "queue")?;
        require_non_empty(access_key, "access_key")?;

        let mut store = self.store.lock().expect("store lock poisoned");
        let queue = store
            .queues
            .get_mut(queue_name)
            .ok_or_else(|| EngineError::NotFound(format!("queue {queue_name}")))?;
        Self::check_access(queue, access_key)?;

        let job = queue
            .jobs
            .iter_mut()
            .find(|j| j.uid == uid)
            .ok_or_else(|| EngineError::NotFound(format!("job {uid}")))?;
        job.state = new_status;
        job.last_updated = now().max(job.last_updated);
        drop(store);

        self.signal_dirty();
        Ok(())
    }

    pub fn delete_job(&self, uid: &str, queue_name: &str, access_key: &str) -> Result<()> {
        require_non_empty(uid, "uid")?;
        require_non_empty(queue_name, "queue")?;
        require_non_empty(access_key, "access_key")?;

        let mut store = self.store.lock().expect("store lock poisoned");
        let queue = store
            .queues
            .get_mut(queue_name)
            .ok_or_else(|| EngineError::NotFound(format!("queue {queue_name}")))?;
        Self::check_access(queue, access_key)?;

        let before = queue.jobs.len();
        queue.jobs.retain(|j| j.uid != uid);
        if queue.jobs.len() == before {
            return Err(EngineError::NotFound(format!("job {uid}")));
        }
        queue.sync_size();
        drop(store);

        self.signal_dirty();
        Ok(())
    }

    /// The maintenance pass. Does not require the access key - it is an
    /// internal sweep invoked by readers on every access to a queue,
    /// concentrating all time-based transitions in one place. Idempotent:
    /// running it twice at the same wall-clock time is a no-op the second
    /// time.
    pub fn update_queue(&self, queue_name: &str) -> Result<()> {
        require_non_empty(queue_name, "queue")?;

        let mut store = self.store.lock().expect("store lock poisoned");
        let queue = store
            .queues
            .get_mut(queue_name)
            .ok_or_else(|| EngineError::NotFound(format!("queue {queue_name}")))?;

        let wall_clock = now();
        let mut keep = Vec::with_capacity(queue.jobs.len());

        for mut job in std::mem::take(&mut queue.jobs) {
            let expire = match job.state {
                JobStatus::Complete | JobStatus::Failed => {
                    job.last_updated < wall_clock - job.keep_minutes * 60
                }
                JobStatus::Inprogress => {
                    if job.last_updated < wall_clock - job.timeout_minutes * 60 {
                        job.state = JobStatus::Failed;
                        job.last_updated = wall_clock;
                        false
                    } else {
                        false
                    }
                }
                JobStatus::Queued => job.timeout_time > 0 && wall_clock > job.timeout_time,
            };

            if !expire {
                keep.push(job);
            }
        }

        queue.jobs = keep;
        queue.resort();
        queue.sync_size();
        drop(store);

        self.signal_dirty();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> (Controller, mpsc::Receiver<bool>) {
        let (tx, rx) = mpsc::channel(1);
        (Controller::new(tx), rx)
    }

    #[test]
    fn create_get_delete_queue_round_trips() {
        let (c, _rx) = controller();
        c.create_queue("orders", "s3cret").unwrap();

        let queue = c.get_queue("orders", "s3cret").unwrap();
        assert_eq!(queue.name, "orders");
        assert_eq!(queue.size, 0);

        c.delete_queue("orders", "s3cret").unwrap();
        assert!(matches!(
            c.get_queue("orders", "s3cret").unwrap_err(),
            EngineError::NotFound(_)
        ));
    }

    #[test]
    fn create_queue_twice_conflicts() {
        let (c, _rx) = controller();
        c.create_queue("orders", "s3cret").unwrap();
        assert!(matches!(
            c.create_queue("orders", "other").unwrap_err(),
            EngineError::Conflict(_)
        ));
    }

    #[test]
    fn wrong_key_is_unauthorized() {
        let (c, _rx) = controller();
        c.create_queue("q", "A").unwrap();
        assert!(matches!(
            c.get_queue("q", "B").unwrap_err(),
            EngineError::Unauthorized
        ));
    }

    #[test]
    fn add_job_then_get_next_job_returns_it_queued() {
        let (c, _rx) = controller();
        c.create_queue("orders", "s3cret").unwrap();

        let job = Job::builder()
            .content(serde_json::json!({"x": 1}))
            .priority(50)
            .timeout_time(now() + 3600)
            .build();
        c.add_job(job, "orders", "s3cret", true).unwrap();

        let next = c.get_next_job("orders", "s3cret").unwrap().unwrap();
        assert_eq!(next.state, JobStatus::Queued);
        assert_eq!(next.priority, 50);
    }

    #[test]
    fn priority_ordering_picks_highest_first() {
        let (c, _rx) = controller();
        c.create_queue("orders", "s3cret").unwrap();

        for priority in [10, 90, 50] {
            let job = Job::builder().priority(priority).build();
            c.add_job(job, "orders", "s3cret", true).unwrap();
        }

        let top = c.get_next_job("orders", "s3cret").unwrap().unwrap();
        assert_eq!(top.priority, 90);

        c.update_job_status(&top.uid, JobStatus::Inprogress, "orders", "s3cret")
            .unwrap();

        let next = c.get_next_job("orders", "s3cret").unwrap().unwrap();
        assert_eq!(next.priority, 50);
    }

    #[test]
    fn maintenance_removes_aged_complete_job() {
        let (c, _rx) = controller();
        c.create_queue("q", "k").unwrap();
        let job = Job::builder()
            .priority(0)
            .state(JobStatus::Complete)
            .last_updated(now() - 3601)
            .keep_minutes(60)
            .build();
        c.add_job(job, "q", "k", true).unwrap();

        c.update_queue("q").unwrap();

        let queue = c.get_queue("q", "k").unwrap();
        assert!(queue.jobs.is_empty());
        assert_eq!(queue.size, 0);
    }

    #[test]
    fn maintenance_times_out_inprogress_job_to_failed() {
        let (c, _rx) = controller();
        c.create_queue("q", "k").unwrap();
        let job = Job::builder()
            .priority(0)
            .state(JobStatus::Inprogress)
            .last_updated(now() - 7201)
            .timeout_minutes(120)
            .build();
        let job = c.add_job(job, "q", "k", true).unwrap();

        c.update_queue("q").unwrap();

        let reloaded = c.get_job(&job.uid, "q", "k").unwrap();
        assert_eq!(reloaded.state, JobStatus::Failed);
        assert!(reloaded.last_updated >= now() - 2);
    }

    #[test]
    fn maintenance_is_idempotent() {
        let (c, _rx) = controller();
        c.create_queue("q", "k").unwrap();
        let job = Job::builder()
            .priority(0)
            .state(JobStatus::Complete)
            .last_updated(now() - 10)
            .keep_minutes(60)
            .build();
        c.add_job(job, "q", "k", true).unwrap();

        c.update_queue("q").unwrap();
        let first = c.get_queue("q", "k").unwrap();
        c.update_queue("q").unwrap();
        let second = c.get_queue("q", "k").unwrap();

        assert_eq!(first.jobs.len(), second.jobs.len());
    }

    #[test]
    fn invariants_hold_after_mixed_operations() {
        let (c, _rx) = controller();
        c.create_queue("q", "k").unwrap();

        for priority in [5, 80, 40, 80, 1] {
            let job = Job::builder().priority(priority).build();
            c.add_job(job, "q", "k", true).unwrap();
        }

        let queue = c.get_queue("q", "k").unwrap();
        assert_eq!(queue.size, queue.jobs.len());
        for window in queue.jobs.windows(2) {
            assert!(window[0].priority >= window[1].priority);
        }

        let mut uids: Vec<_> = queue.jobs.iter().map(|j| j.uid.clone()).collect();
        uids.sort();
        uids.dedup();
        assert_eq!(uids.len(), queue.jobs.len());
    }
}
