//! Encrypted snapshot pipeline: serialize the [`crate::queue::Store`], seal
//! it with AES-GCM, and write it atomically; the inverse on load.
//!
//! ```text
//! Controller::snapshot() ─► codec::encode ─► Cipher::encrypt ─► atomic write
//!                                                                    │
//!                                                                 disk file
//!                                                                    │
//! Controller::replace_store() ◄─ codec::decode ◄─ Cipher::decrypt ◄─┘
//! ```
//!
//! [`monitor::PersistenceMonitor`] is the only component that calls
//! [`snapshot::SnapshotStore::save`] after startup; it is driven by a
//! single-slot dirty channel so bursts of controller mutations coalesce
//! into at most one pending save.

pub mod codec;
pub mod filesystem;
pub mod monitor;
pub mod snapshot;

pub use filesystem::Filesystem;
pub use monitor::PersistenceMonitor;
pub use snapshot::SnapshotStore;
