//! In-memory queue store and the controller that owns it.
//!
//! ```text
//! Store { queues: HashMap<name, QueueRecord> }
//!                             │
//!                  QueueRecord { access_key_hash, jobs: Vec<Job> }
//!                             │
//!                        Controller
//!              (the only thing that ever locks the store)
//! ```
//!
//! Everything here is plain data - [`Store`], [`QueueRecord`], [`Job`] all
//! derive `Serialize`/`Deserialize` directly, so the snapshot codec can
//! encode a [`Store`] with no translation layer. [`Controller`] is the sole
//! owner of the lock that guards the store and the sole place access keys
//! are checked.

pub mod controller;
pub mod job;
pub mod record;
pub mod store;

pub use controller::Controller;
pub use job::{Job, JobStatus, MAX_PRIORITY, MIN_PRIORITY};
pub use record::QueueRecord;
pub use store::Store;
