//! Encode/decode helpers over `prost` messages.

use crate::error::{ProtocolError, ProtocolResult};
use prost::Message;
use tracing::trace;

fn message_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Decode a complete message from `bytes`.
pub fn decode<T: Message + Default>(bytes: &[u8]) -> ProtocolResult<T> {
    T::decode(bytes).map_err(|source| ProtocolError::Decode {
        message: message_name::<T>(),
        source,
    })
}

/// Number of bytes `msg` will occupy once encoded.
pub fn estimated_size<T: Message>(msg: &T) -> usize {
    msg.encoded_len()
}

/// Encode `msg` into a freshly sized buffer.
///
/// The buffer is allocated from the size estimate and the encode must fill
/// it exactly.
pub fn encode<T: Message>(msg: &T) -> ProtocolResult<Vec<u8>> {
    let estimated = estimated_size(msg);
    let mut buf = Vec::with_capacity(estimated);
    msg.encode(&mut buf).map_err(|source| ProtocolError::Encode {
        message: message_name::<T>(),
        source,
    })?;

    if buf.len() != estimated {
        return Err(ProtocolError::SizeMismatch {
            message: message_name::<T>(),
            estimated,
            written: buf.len(),
        });
    }

    trace!(message = message_name::<T>(), size = estimated, "Encoded message");
    Ok(buf)
}

/// Encode `msg` into the front of a caller-owned buffer and return the
/// number of bytes written.
///
/// Nothing is written when the buffer cannot hold the whole message.
pub fn encode_into<T: Message>(msg: &T, out: &mut [u8]) -> ProtocolResult<usize> {
    let required = estimated_size(msg);
    let capacity = out.len();
    if required > capacity {
        return Err(ProtocolError::OutputBufferTooSmall {
            message: message_name::<T>(),
            required,
            capacity,
        });
    }

    let mut cursor: &mut [u8] = &mut out[..required];
    msg.encode(&mut cursor).map_err(|source| ProtocolError::Encode {
        message: message_name::<T>(),
        source,
    })?;

    // an exact-size slice is fully consumed by a faithful encode
    if !cursor.is_empty() {
        return Err(ProtocolError::SizeMismatch {
            message: message_name::<T>(),
            estimated: required,
            written: required - cursor.len(),
        });
    }

    Ok(required)
}
