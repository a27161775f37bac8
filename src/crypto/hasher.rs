use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use crate::errors::{EngineError, Result};

/// Selectable one-way hash algorithm.
///
/// Used both for hashing per-queue access keys and for deriving the
/// snapshot's AES key from the configured secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl std::str::FromStr for HashAlgorithm {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            other => Err(EngineError::InvalidArgument(format!(
                "unknown hash algorithm: {other}"
            ))),
        }
    }
}

/// Hash `input` with `algorithm`, returning the lowercase hex digest.
///
/// Each call behaves as though performed on a fresh hasher instance,
/// regardless of how many times this function has been called before.
pub fn hash(algorithm: HashAlgorithm, input: &str) -> Result<String> {
    if input.is_empty() {
        return Err(EngineError::InvalidArgument("empty hash input".into()));
    }

    let digest = match algorithm {
        HashAlgorithm::Md5 => format!("{:x}", md5::compute(input.as_bytes())),
        HashAlgorithm::Sha1 => {
            let mut hasher = Sha1::new();
            hasher.update(input.as_bytes());
            hex::encode(hasher.finalize())
        }
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            hasher.update(input.as_bytes());
            hex::encode(hasher.finalize())
        }
        HashAlgorithm::Sha512 => {
            let mut hasher = Sha512::new();
            hasher.update(input.as_bytes());
            hex::encode(hasher.finalize())
        }
    };

    if digest.is_empty() {
        return Err(EngineError::Internal("generated hash is empty".into()));
    }

    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_digest_is_32_lowercase_hex_chars() {
        let digest = hash(HashAlgorithm::Md5, "hello_world").unwrap();
        assert_eq!(digest.len(), 32);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn empty_input_is_invalid_argument() {
        let err = hash(HashAlgorithm::Sha256, "").unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
    }

    #[test]
    fn repeated_calls_are_independent() {
        let first = hash(HashAlgorithm::Sha1, "a").unwrap();
        let second = hash(HashAlgorithm::Sha1, "b").unwrap();
        let third = hash(HashAlgorithm::Sha1, "a").unwrap();
        assert_eq!(first, third);
        assert_ne!(first, second);
    }

    #[test]
    fn different_algorithms_produce_different_length_digests() {
        let sha256 = hash(HashAlgorithm::Sha256, "same-input").unwrap();
        let sha512 = hash(HashAlgorithm::Sha512, "same-input").unwrap();
        assert_eq!(sha256.len(), 64);
        assert_eq!(sha512.len(), 128);
    }
}
