//! Cryptographic primitives used by the queue engine.
//!
//! - [`hasher`] produces the stable hex digests used for access-key checks and
//!   for deriving the snapshot's AES key from the configured secret.
//! - [`cipher`] is the AEAD cipher that encrypts the on-disk snapshot.

pub mod cipher;
pub mod hasher;

pub use cipher::Cipher;
pub use hasher::{hash, HashAlgorithm};
