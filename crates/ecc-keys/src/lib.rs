//! # ecc-keys
//!
//! Key types and cryptographic primitives used on both sides of the enclave
//! boundary.
//!
//! - [`SymmetricKey`]: ChaCha20-Poly1305 key for request/response payloads
//! - [`EncryptionKeyPair`] / [`EncryptionPublicKey`]: P-256 ECIES used to
//!   deliver the per-call symmetric keys
//! - [`SigningKeyPair`] / [`SigningPublicKey`]: ECDSA P-256 over SHA-256
//! - [`MessageHash`]: SHA-256 digest binding responses to requests
//!
//! Every authentication failure surfaces as the same [`KeyError::Decrypt`]
//! so callers cannot tell a wrong key from a tampered ciphertext.

pub mod error;
pub mod hash;
pub mod signing;
pub mod symmetric;
pub mod transport;

pub use error::{KeyError, KeyResult};
pub use hash::MessageHash;
pub use signing::{SigningKeyPair, SigningPublicKey, SIGNATURE_LENGTH};
pub use symmetric::{SymmetricKey, NONCE_LENGTH, SYMMETRIC_KEY_LENGTH, TAG_LENGTH};
pub use transport::{EncryptionKeyPair, EncryptionPublicKey, PUBLIC_KEY_LENGTH};
