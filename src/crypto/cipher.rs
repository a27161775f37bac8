use aes_gcm::aead::{Aead, AeadCore, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::rngs::OsRng;

use super::hasher::{hash, HashAlgorithm};
use crate::errors::{EngineError, Result};

/// Authenticated symmetric cipher for the snapshot blob.
///
/// The secret is hashed with [`HashAlgorithm::Md5`] first; the resulting
/// 32-character hex string is used verbatim as the AES-256 key bytes. This
/// matches the legacy on-disk format: the key is the ASCII bytes of the hex
/// digest, not the 16 raw digest bytes decoded back from hex.
pub struct Cipher {
    key: Aes256Gcm,
}

impl Cipher {
    /// Construct a cipher from a plaintext secret.
    pub fn new(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(EngineError::InvalidArgument("empty secret".into()));
        }

        let hex_key = hash(HashAlgorithm::Md5, secret)?;
        if hex_key.len() != 32 {
            return Err(EngineError::CryptoError(
                "derived key is not 32 bytes".into(),
            ));
        }

        let key = Key::<Aes256Gcm>::from_slice(hex_key.as_bytes());
        Ok(Self {
            key: Aes256Gcm::new(key),
        })
    }

    /// Encrypt `plaintext`, returning `nonce || ciphertext_with_tag`.
    ///
    /// A fresh random nonce is generated on every call, so the same
    /// plaintext never produces the same bytes twice.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .key
            .encrypt(&nonce, plaintext)
            .map_err(|e| EngineError::CryptoError(format!("encrypt failed: {e}")))?;

        let mut out = Vec::with_capacity(nonce.len() + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypt `nonce || ciphertext_with_tag`, verifying the AEAD tag.
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>> {
        let nonce_len = 12; // AES-GCM nonce length
        if data.len() < nonce_len {
            return Err(EngineError::CryptoError(format!(
                "data too short for nonce, size: {}, nonce_size: {}",
                data.len(),
                nonce_len
            )));
        }

        let (nonce_bytes, ciphertext) = data.split_at(nonce_len);
        let nonce = Nonce::from_slice(nonce_bytes);

        self.key
            .decrypt(nonce, ciphertext)
            .map_err(|e| EngineError::CryptoError(format!("decrypt failed: {e}")))
    }
}
