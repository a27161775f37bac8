//! Plain JSON encode/decode of a [`Store`]. Kept separate from
//! [`super::snapshot`] so the wire format can be swapped without touching
//! the encryption or file-handling logic.

use crate::errors::{EngineError, Result};
use crate::queue::Store;

pub fn encode(store: &Store) -> Result<Vec<u8>> {
    serde_json::to_vec(store).map_err(|e| EngineError::Internal(format!("encode failed: {e}")))
}

pub fn decode(bytes: &[u8]) -> Result<Store> {
    serde_json::from_slice(bytes).map_err(|e| EngineError::Internal(format!("decode failed: {e}")))
}
