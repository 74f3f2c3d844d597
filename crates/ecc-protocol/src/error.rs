//! Codec error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Decode error ({message}): {source}")]
    Decode {
        message: &'static str,
        #[source]
        source: prost::DecodeError,
    },

    #[error("Encoded size mismatch for {message}: estimated {estimated}, wrote {written}")]
    SizeMismatch {
        message: &'static str,
        estimated: usize,
        written: usize,
    },

    #[error("Encode error ({message}): {source}")]
    Encode {
        message: &'static str,
        #[source]
        source: prost::EncodeError,
    },

    #[error("Output buffer too small for {message}: need {required} bytes, capacity {capacity}")]
    OutputBufferTooSmall {
        message: &'static str,
        required: usize,
        capacity: usize,
    },
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
