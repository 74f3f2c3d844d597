//! Client error types.

use ecc_keys::KeyError;
use ecc_protocol::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Encode error: {0}")]
    Encode(#[source] ProtocolError),

    #[error("Decode error: {0}")]
    Decode(#[source] ProtocolError),

    #[error("Encryption failed: {0}")]
    Encrypt(#[source] KeyError),

    #[error("Response signature is invalid")]
    InvalidSignature,

    #[error("Response is bound to a different request")]
    RequestHashMismatch,

    #[error("Enclave id mismatch: expected {expected}, got {got}")]
    EnclaveIdMismatch { expected: String, got: String },

    #[error("Response decryption failed")]
    ResponseDecrypt,

    #[error("Response payload is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
}

pub type ClientResult<T> = Result<T, ClientError>;
