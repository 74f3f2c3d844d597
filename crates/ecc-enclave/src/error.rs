//! Pipeline error types.
//!
//! Errors carry enough detail for trusted-side logs. None of it crosses the
//! enclave boundary: the caller only ever sees [`EcallStatus::Failure`].
//!
//! [`EcallStatus::Failure`]: crate::EcallStatus::Failure

use crate::attestation::AttestationError;
use ecc_protocol::ProtocolError;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EccError {
    #[error("Chaincode request message decode failed: {0}")]
    RequestMessageDecode(#[source] ProtocolError),

    #[error("Required field is empty: {0}")]
    EmptyField(&'static str),

    #[error("Key transport decryption failed")]
    KeyTransportDecrypt,

    #[error("Key transport decode failed: {0}")]
    KeyTransportDecode(String),

    #[error("Request decryption failed")]
    RequestDecrypt,

    #[error("Request decode failed: {0}")]
    RequestDecode(String),

    #[error("Request carries no arguments")]
    EmptyArguments,

    #[error("Signed proposal decode failed: {0}")]
    ProposalDecode(#[source] ProtocolError),

    #[error("No output capacity left: caller capacity {caller_capacity}, reserve {reserve}")]
    CapacityBudget {
        caller_capacity: usize,
        reserve: usize,
    },

    #[error("Chaincode panicked during invocation")]
    ChaincodePanicked,

    #[error("Chaincode reported {written} bytes written into a {capacity}-byte buffer")]
    CapacityExceeded { written: usize, capacity: usize },

    #[error("Response encryption failed")]
    ResponseEncrypt,

    #[error("Encode error: {0}")]
    Encode(#[source] ProtocolError),

    #[error("Signing failed")]
    Signing,

    #[error("Output buffer too small: need {required} bytes, capacity {capacity}")]
    OutputBufferTooSmall { required: usize, capacity: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Attestation error: {0}")]
    Attestation(#[from] AttestationError),
}

pub type EccResult<T> = Result<T, EccError>;

/// Coarse failure classes used in logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Decode,
    Decrypt,
    EmptyField,
    Encode,
    Chaincode,
    Signing,
    OutputBufferTooSmall,
    Config,
    Attestation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Decode => write!(f, "decode"),
            ErrorKind::Decrypt => write!(f, "decrypt"),
            ErrorKind::EmptyField => write!(f, "empty_field"),
            ErrorKind::Encode => write!(f, "encode"),
            ErrorKind::Chaincode => write!(f, "chaincode"),
            ErrorKind::Signing => write!(f, "signing"),
            ErrorKind::OutputBufferTooSmall => write!(f, "output_buffer_too_small"),
            ErrorKind::Config => write!(f, "config"),
            ErrorKind::Attestation => write!(f, "attestation"),
        }
    }
}

impl EccError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EccError::RequestMessageDecode(_)
            | EccError::KeyTransportDecode(_)
            | EccError::RequestDecode(_)
            | EccError::ProposalDecode(_) => ErrorKind::Decode,
            EccError::KeyTransportDecrypt | EccError::RequestDecrypt => ErrorKind::Decrypt,
            EccError::EmptyField(_) | EccError::EmptyArguments => ErrorKind::EmptyField,
            EccError::CapacityExceeded { .. }
            | EccError::ResponseEncrypt
            | EccError::Encode(_) => ErrorKind::Encode,
            EccError::ChaincodePanicked => ErrorKind::Chaincode,
            EccError::Signing => ErrorKind::Signing,
            EccError::CapacityBudget { .. } | EccError::OutputBufferTooSmall { .. } => {
                ErrorKind::OutputBufferTooSmall
            }
            EccError::InvalidConfig(_) => ErrorKind::Config,
            EccError::Attestation(_) => ErrorKind::Attestation,
        }
    }
}

impl From<ProtocolError> for EccError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::OutputBufferTooSmall {
                required, capacity, ..
            } => EccError::OutputBufferTooSmall { required, capacity },
            other => EccError::Encode(other),
        }
    }
}
