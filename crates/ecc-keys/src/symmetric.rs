//! Authenticated symmetric encryption for request and response payloads.
//!
//! Ciphertext layout: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.

use crate::error::{KeyError, KeyResult};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::{rngs::OsRng, RngCore};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const SYMMETRIC_KEY_LENGTH: usize = 32;
pub const NONCE_LENGTH: usize = 12;
pub const TAG_LENGTH: usize = 16;

/// A 256-bit ChaCha20-Poly1305 key, wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; SYMMETRIC_KEY_LENGTH]);

impl SymmetricKey {
    /// Fresh random key from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SYMMETRIC_KEY_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SYMMETRIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> KeyResult<Self> {
        if bytes.len() != SYMMETRIC_KEY_LENGTH {
            return Err(KeyError::InvalidKeyLength {
                expected: SYMMETRIC_KEY_LENGTH,
                got: bytes.len(),
            });
        }
        let mut key = [0u8; SYMMETRIC_KEY_LENGTH];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; SYMMETRIC_KEY_LENGTH] {
        &self.0
    }

    fn cipher(&self) -> ChaCha20Poly1305 {
        ChaCha20Poly1305::new(Key::from_slice(&self.0))
    }

    /// Encrypt under a fresh random nonce.
    pub fn seal(&self, plaintext: &[u8]) -> KeyResult<Vec<u8>> {
        let mut nonce = [0u8; NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher()
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| KeyError::Encrypt)?;

        let mut out = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypt and authenticate a [`seal`](Self::seal) output.
    pub fn open(&self, sealed: &[u8]) -> KeyResult<Vec<u8>> {
        if sealed.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(KeyError::Decrypt);
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LENGTH);

        self.cipher()
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| KeyError::Decrypt)
    }

    /// Size of the sealed form of a `plaintext_len`-byte message.
    pub const fn sealed_len(plaintext_len: usize) -> usize {
        NONCE_LENGTH + plaintext_len + TAG_LENGTH
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey(<redacted>)")
    }
}
