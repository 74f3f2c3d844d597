//! ECIES over P-256 for delivering per-call keys to the enclave.
//!
//! Sealed layout:
//!
//! ```text
//! ephemeral public key (65 bytes, SEC1 uncompressed)
//! || nonce (12 bytes) || ciphertext || tag (16 bytes)
//! ```
//!
//! The AEAD key is HKDF-SHA256(salt = ephemeral public key,
//! ikm = ECDH shared secret, info = [`KEY_TRANSPORT_INFO`]).

use crate::error::{KeyError, KeyResult};
use crate::symmetric::{SymmetricKey, NONCE_LENGTH, SYMMETRIC_KEY_LENGTH, TAG_LENGTH};
use hkdf::Hkdf;
use p256::{
    ecdh::{diffie_hellman, EphemeralSecret, SharedSecret},
    elliptic_curve::sec1::ToEncodedPoint,
    PublicKey, SecretKey,
};
use rand::rngs::OsRng;
use sha2::Sha256;
use std::fmt;
use tracing::debug;
use zeroize::Zeroizing;

/// SEC1 uncompressed P-256 point length.
pub const PUBLIC_KEY_LENGTH: usize = 65;

const KEY_TRANSPORT_INFO: &[u8] = b"ecc-key-transport-v1";

fn derive_key(shared: &SharedSecret, ephemeral_public: &[u8]) -> KeyResult<SymmetricKey> {
    let hk = Hkdf::<Sha256>::new(Some(ephemeral_public), shared.raw_secret_bytes().as_slice());
    let mut okm = Zeroizing::new([0u8; SYMMETRIC_KEY_LENGTH]);
    hk.expand(KEY_TRANSPORT_INFO, &mut okm[..])
        .map_err(|_| KeyError::KeyDerivation)?;
    Ok(SymmetricKey::from_bytes(*okm))
}

/// Long-term enclave decryption key.
#[derive(Clone)]
pub struct EncryptionKeyPair {
    secret: SecretKey,
}

impl EncryptionKeyPair {
    pub fn generate() -> Self {
        Self {
            secret: SecretKey::random(&mut OsRng),
        }
    }

    pub fn public_key(&self) -> EncryptionPublicKey {
        EncryptionPublicKey(self.secret.public_key())
    }

    /// Open a blob produced by [`EncryptionPublicKey::seal`].
    ///
    /// Malformed input and authentication failure both return
    /// [`KeyError::Decrypt`].
    pub fn open(&self, sealed: &[u8]) -> KeyResult<Zeroizing<Vec<u8>>> {
        if sealed.len() < PUBLIC_KEY_LENGTH + NONCE_LENGTH + TAG_LENGTH {
            debug!(len = sealed.len(), "Key transport blob shorter than minimum");
            return Err(KeyError::Decrypt);
        }
        let (ephemeral, body) = sealed.split_at(PUBLIC_KEY_LENGTH);

        let ephemeral_key = PublicKey::from_sec1_bytes(ephemeral).map_err(|_| {
            debug!("Key transport ephemeral key is not a valid P-256 point");
            KeyError::Decrypt
        })?;

        let shared = diffie_hellman(self.secret.to_nonzero_scalar(), ephemeral_key.as_affine());
        let key = derive_key(&shared, ephemeral)?;

        key.open(body).map(Zeroizing::new).map_err(|e| {
            debug!("Key transport authentication failed");
            e
        })
    }
}

impl fmt::Debug for EncryptionKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionKeyPair")
            .field("public", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// Public half of the enclave encryption key, published via attestation.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EncryptionPublicKey(PublicKey);

impl EncryptionPublicKey {
    pub fn from_sec1_bytes(bytes: &[u8]) -> KeyResult<Self> {
        PublicKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|_| KeyError::InvalidPublicKey)
    }

    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        self.0.to_encoded_point(false).as_bytes().to_vec()
    }

    /// Encrypt `plaintext` so only the holder of the matching
    /// [`EncryptionKeyPair`] can read it.
    pub fn seal(&self, plaintext: &[u8]) -> KeyResult<Vec<u8>> {
        let ephemeral = EphemeralSecret::random(&mut OsRng);
        let ephemeral_public = ephemeral.public_key().to_encoded_point(false);
        let shared = ephemeral.diffie_hellman(&self.0);
        let key = derive_key(&shared, ephemeral_public.as_bytes())?;

        let body = key.seal(plaintext)?;
        let mut out = Vec::with_capacity(PUBLIC_KEY_LENGTH + body.len());
        out.extend_from_slice(ephemeral_public.as_bytes());
        out.extend_from_slice(&body);
        Ok(out)
    }
}

impl fmt::Debug for EncryptionPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptionPublicKey({})", hex::encode(self.to_sec1_bytes()))
    }
}
