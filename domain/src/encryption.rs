//! AES-256-GCM encryption for provider API keys stored in the database.
//!
//! The cipher key is the SHA-256 digest of the process-wide encryption secret, so the
//! same secret always yields the same key across restarts. Ciphertexts are
//! `base64(nonce || ciphertext)` with a random 12-byte nonce.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use log::*;
use rand::Rng;
use service::config::Config;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::error::{DomainErrorKind, Error as DomainError, InternalErrorKind};

/// 12-byte nonce size for AES-GCM
const NONCE_SIZE: usize = 12;

/// Errors that can occur during encryption/decryption operations
#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("Failed to decode base64 ciphertext: {0}")]
    Base64DecodeError(#[from] base64::DecodeError),

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Decryption failed - data may be corrupted or key is incorrect")]
    DecryptionFailed,

    #[error("Ciphertext too short - missing nonce")]
    CiphertextTooShort,

    #[error("No encryption secret configured")]
    NoKeyConfigured,
}

/// Reversible encryption of API keys under a key derived from one secret.
#[derive(Clone)]
pub struct SecretCodec {
    cipher: Aes256Gcm,
}

impl SecretCodec {
    pub fn new(secret: &str) -> Self {
        let key = Sha256::digest(secret.as_bytes());
        Self {
            cipher: Aes256Gcm::new(&key),
        }
    }

    /// Builds the codec from the configured encryption secret.
    pub fn from_config(config: &Config) -> Result<Self, DomainError> {
        match config.encryption_secret() {
            Some(secret) if !secret.is_empty() => Ok(Self::new(secret)),
            _ => {
                warn!("ENCRYPTION_SECRET is not set; stored API keys cannot be read or written");
                Err(DomainError {
                    source: Some(Box::new(EncryptionError::NoKeyConfigured)),
                    error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
                })
            }
        }
    }

    /// Encrypts plaintext with a fresh random nonce. Empty input encrypts to empty output.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| EncryptionError::EncryptionFailed)?;

        // Prepend nonce to ciphertext and base64 encode
        let mut combined = nonce_bytes.to_vec();
        combined.extend(ciphertext);

        Ok(BASE64.encode(combined))
    }

    /// Decrypts a value produced by `encrypt`.
    pub fn try_decrypt(&self, ciphertext_b64: &str) -> Result<String, EncryptionError> {
        let combined = BASE64.decode(ciphertext_b64)?;

        if combined.len() < NONCE_SIZE {
            return Err(EncryptionError::CiphertextTooShort);
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext_bytes = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| EncryptionError::DecryptionFailed)?;

        String::from_utf8(plaintext_bytes).map_err(|_| EncryptionError::DecryptionFailed)
    }

    /// Decrypts `value`, or returns it unchanged when it is not a ciphertext of this codec.
    ///
    /// Keys written before encryption was enabled are stored as plaintext and keep working.
    pub fn decrypt(&self, value: &str) -> String {
        if value.is_empty() {
            return String::new();
        }

        match self.try_decrypt(value) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                debug!("Value is not a readable ciphertext ({e}), using it as stored");
                value.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "django-insecure-test-secret";

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let codec = SecretCodec::new(TEST_SECRET);
        let plaintext = "AIzaSyD-my-secret-api-key-12345";

        let encrypted = codec.encrypt(plaintext).expect("encryption should succeed");
        assert_ne!(encrypted, plaintext);

        assert_eq!(codec.decrypt(&encrypted), plaintext);
    }

    #[test]
    fn test_encrypt_produces_different_outputs() {
        // Due to random nonce, encrypting same plaintext should produce different ciphertexts
        let codec = SecretCodec::new(TEST_SECRET);
        let encrypted1 = codec.encrypt("gsk_test").unwrap();
        let encrypted2 = codec.encrypt("gsk_test").unwrap();

        assert_ne!(encrypted1, encrypted2);
        assert_eq!(codec.try_decrypt(&encrypted1).unwrap(), "gsk_test");
        assert_eq!(codec.try_decrypt(&encrypted2).unwrap(), "gsk_test");
    }

    #[test]
    fn test_key_derivation_is_deterministic() {
        let encrypted = SecretCodec::new(TEST_SECRET).encrypt("persisted").unwrap();

        // A codec built later from the same secret reads the value back
        let restarted = SecretCodec::new(TEST_SECRET);
        assert_eq!(restarted.try_decrypt(&encrypted).unwrap(), "persisted");
    }

    #[test]
    fn test_wrong_secret_fails_strict_decryption() {
        let encrypted = SecretCodec::new(TEST_SECRET).encrypt("secret").unwrap();
        let other = SecretCodec::new("another-secret");

        assert!(matches!(
            other.try_decrypt(&encrypted),
            Err(EncryptionError::DecryptionFailed)
        ));
        // The lenient form hands the stored value back untouched
        assert_eq!(other.decrypt(&encrypted), encrypted);
    }

    #[test]
    fn test_plaintext_passes_through_decrypt() {
        let codec = SecretCodec::new(TEST_SECRET);
        assert_eq!(codec.decrypt("gsk_plaintext_legacy_key"), "gsk_plaintext_legacy_key");
        assert!(matches!(
            codec.try_decrypt("not_valid_base64!!!"),
            Err(EncryptionError::Base64DecodeError(_))
        ));
    }

    #[test]
    fn test_ciphertext_too_short() {
        let codec = SecretCodec::new(TEST_SECRET);
        // Valid base64 but too short to contain nonce
        assert!(matches!(
            codec.try_decrypt("YWJj"),
            Err(EncryptionError::CiphertextTooShort)
        ));
        assert_eq!(codec.decrypt("YWJj"), "YWJj");
    }

    #[test]
    fn test_empty_values() {
        let codec = SecretCodec::new(TEST_SECRET);
        assert_eq!(codec.encrypt("").unwrap(), "");
        assert_eq!(codec.decrypt(""), "");
    }

    #[test]
    fn test_unicode_plaintext() {
        let codec = SecretCodec::new(TEST_SECRET);
        let plaintext = "kunci-rahasia-✓-🔐";
        let encrypted = codec.encrypt(plaintext).unwrap();
        assert_eq!(codec.decrypt(&encrypted), plaintext);
    }
}
