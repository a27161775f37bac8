use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::record::QueueRecord;

/// The entire queue store: a mapping from queue name to queue record.
///
/// This is the plain data that gets encoded, encrypted, and written to disk
/// by the snapshot pipeline. It carries no lock of its own - the
/// [`crate::queue::controller::Controller`] owns the mutex that guards it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Store {
    pub queues: HashMap<String, QueueRecord>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }
}
