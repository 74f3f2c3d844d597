//! Key error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("Invalid public key encoding")]
    InvalidPublicKey,

    /// Deliberately carries no detail.
    #[error("Decryption failed")]
    Decrypt,

    #[error("Encryption failed")]
    Encrypt,

    #[error("Key derivation failed")]
    KeyDerivation,

    #[error("Signing failed")]
    Signing,

    #[error("Malformed signature")]
    InvalidSignature,

    #[error("Signature verification failed")]
    VerificationFailed,
}

pub type KeyResult<T> = Result<T, KeyError>;
