//! Codec for the enclave wire messages.
//!
//! Every encode goes through a size estimate first; the bytes actually
//! produced must match that estimate exactly, otherwise the encode fails.
//! Decoding is all-or-nothing: a truncated or malformed buffer yields an
//! error and no partially populated message. A buffer cut exactly at a
//! field boundary is itself a valid encoding with the trailing fields at
//! their defaults; the codec cannot tell it apart, so consumers reject it
//! through their required non-empty field checks.

pub mod codec;
pub mod error;

pub use codec::{decode, encode, encode_into, estimated_size};
pub use error::{ProtocolError, ProtocolResult};
