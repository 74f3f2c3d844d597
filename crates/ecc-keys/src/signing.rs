//! ECDSA P-256 response signing.

use crate::error::{KeyError, KeyResult};
use crate::hash::MessageHash;
use p256::ecdsa::{
    signature::{Signer, Verifier},
    Signature, SigningKey, VerifyingKey,
};
use rand::rngs::OsRng;
use std::fmt;

/// Fixed-size `r || s` signature length.
pub const SIGNATURE_LENGTH: usize = 64;

/// Long-term enclave signing key.
pub struct SigningKeyPair {
    key: SigningKey,
}

impl SigningKeyPair {
    pub fn generate() -> Self {
        Self {
            key: SigningKey::random(&mut OsRng),
        }
    }

    pub fn public_key(&self) -> SigningPublicKey {
        SigningPublicKey(self.key.verifying_key().clone())
    }

    /// Sign exactly `message` (SHA-256 is applied internally).
    pub fn sign(&self, message: &[u8]) -> KeyResult<Vec<u8>> {
        let signature: Signature = self.key.try_sign(message).map_err(|_| KeyError::Signing)?;
        Ok(signature.to_bytes().to_vec())
    }
}

impl fmt::Debug for SigningKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKeyPair")
            .field("public", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// Public verification key, published via attestation.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningPublicKey(VerifyingKey);

impl SigningPublicKey {
    pub fn from_sec1_bytes(bytes: &[u8]) -> KeyResult<Self> {
        VerifyingKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|_| KeyError::InvalidPublicKey)
    }

    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        self.0.to_encoded_point(false).as_bytes().to_vec()
    }

    /// Digest of the encoded key; used as the enclave id.
    pub fn fingerprint(&self) -> MessageHash {
        MessageHash::digest(&self.to_sec1_bytes())
    }

    pub fn verify(&self, message: &[u8], signature: &[u8]) -> KeyResult<()> {
        let signature = Signature::from_slice(signature).map_err(|_| KeyError::InvalidSignature)?;
        self.0
            .verify(message, &signature)
            .map_err(|_| KeyError::VerificationFailed)
    }
}

impl fmt::Debug for SigningPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningPublicKey({})", hex::encode(self.to_sec1_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let keypair = SigningKeyPair::generate();
        let signature = keypair.sign(b"response bytes").unwrap();

        assert_eq!(signature.len(), SIGNATURE_LENGTH);
        assert!(keypair.public_key().verify(b"response bytes", &signature).is_ok());
    }

    #[test]
    fn test_modified_message_fails() {
        let keypair = SigningKeyPair::generate();
        let message = b"response bytes".to_vec();
        let signature = keypair.sign(&message).unwrap();

        for byte in 0..message.len() {
            let mut tampered = message.clone();
            tampered[byte] ^= 0x01;
            assert!(keypair.public_key().verify(&tampered, &signature).is_err());
        }
    }

    #[test]
    fn test_modified_signature_fails() {
        let keypair = SigningKeyPair::generate();
        let signature = keypair.sign(b"response bytes").unwrap();

        for byte in 0..signature.len() {
            let mut tampered = signature.clone();
            tampered[byte] ^= 0x80;
            assert!(keypair.public_key().verify(b"response bytes", &tampered).is_err());
        }
    }

    #[test]
    fn test_public_key_roundtrip() {
        let keypair = SigningKeyPair::generate();
        let bytes = keypair.public_key().to_sec1_bytes();

        assert_eq!(SigningPublicKey::from_sec1_bytes(&bytes).unwrap(), keypair.public_key());
        assert_eq!(keypair.public_key().fingerprint(), MessageHash::digest(&bytes));
    }

    #[test]
    fn test_other_key_rejects() {
        let signature = SigningKeyPair::generate().sign(b"msg").unwrap();
        let other = SigningKeyPair::generate();

        assert!(matches!(
            other.public_key().verify(b"msg", &signature),
            Err(KeyError::VerificationFailed)
        ));
    }
}
