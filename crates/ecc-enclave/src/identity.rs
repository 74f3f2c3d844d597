//! Long-lived enclave key material.

use crate::attestation::{AttestationProvider, EnclaveCredentials};
use crate::error::{EccError, EccResult};
use ecc_keys::{EncryptionKeyPair, EncryptionPublicKey, SigningKeyPair, SigningPublicKey};
use tracing::{info, warn};
use zeroize::Zeroizing;

/// Key material of one enclave instance.
///
/// Created once at enclave initialization and shared read-only (usually as
/// `Arc<EnclaveIdentity>`) by every invocation. Private halves never leave
/// this type.
#[derive(Debug)]
pub struct EnclaveIdentity {
    encryption: EncryptionKeyPair,
    signing: SigningKeyPair,
    enclave_id: String,
}

impl EnclaveIdentity {
    /// Generate fresh key material.
    pub fn generate() -> Self {
        let identity = Self::from_keys(EncryptionKeyPair::generate(), SigningKeyPair::generate());
        info!(enclave_id = %identity.enclave_id, "Enclave identity created");
        identity
    }

    /// Build an identity from existing key material. The enclave id is
    /// derived from the signing key.
    pub fn from_keys(encryption: EncryptionKeyPair, signing: SigningKeyPair) -> Self {
        let enclave_id = signing.public_key().fingerprint().to_hex_upper();
        Self {
            encryption,
            signing,
            enclave_id,
        }
    }

    pub fn id(&self) -> &str {
        &self.enclave_id
    }

    pub fn public_encryption_key(&self) -> EncryptionPublicKey {
        self.encryption.public_key()
    }

    pub fn public_signing_key(&self) -> SigningPublicKey {
        self.signing.public_key()
    }

    /// Unwrap a key-transport blob sealed to this enclave.
    ///
    /// Every failure collapses into [`EccError::KeyTransportDecrypt`].
    pub fn decrypt_key_transport(&self, ciphertext: &[u8]) -> EccResult<Zeroizing<Vec<u8>>> {
        self.encryption.open(ciphertext).map_err(|e| {
            warn!(enclave_id = %self.enclave_id, error = %e, "Key transport unwrap failed");
            EccError::KeyTransportDecrypt
        })
    }

    pub fn sign(&self, bytes: &[u8]) -> EccResult<Vec<u8>> {
        self.signing.sign(bytes).map_err(|e| {
            warn!(enclave_id = %self.enclave_id, error = %e, "Response signing failed");
            EccError::Signing
        })
    }

    /// Report data committing to both public keys.
    pub fn report_data(&self) -> [u8; 32] {
        EnclaveCredentials::binding_digest(
            &self.public_encryption_key().to_sec1_bytes(),
            &self.public_signing_key().to_sec1_bytes(),
        )
    }

    /// Ask the platform to attest the public keys of this identity.
    pub fn credentials(&self, provider: &dyn AttestationProvider) -> EccResult<EnclaveCredentials> {
        let target = provider.target_info()?;
        let attestation = provider.local_report(&target, self.report_data())?;

        info!(
            enclave_id = %self.enclave_id,
            attestation_type = %attestation.attestation_type,
            measurement = %attestation.measurement_hex(),
            "Enclave credentials attested"
        );

        Ok(EnclaveCredentials {
            enclave_id: self.enclave_id.clone(),
            encryption_key: self.public_encryption_key().to_sec1_bytes(),
            signing_key: self.public_signing_key().to_sec1_bytes(),
            attestation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_signing_key_is_stable() {
        let identity = EnclaveIdentity::generate();
        let first = identity.public_signing_key();

        for _ in 0..10 {
            assert_eq!(identity.public_signing_key(), first);
        }
        assert_eq!(identity.public_encryption_key(), identity.public_encryption_key());
    }

    #[test]
    fn test_enclave_id_bound_to_signing_key() {
        let identity = EnclaveIdentity::generate();
        let expected = identity.public_signing_key().fingerprint().to_hex_upper();

        assert_eq!(identity.id(), expected);
        assert_eq!(identity.id().len(), 64);
        assert_ne!(identity.id(), EnclaveIdentity::generate().id());
    }

    #[test]
    fn test_key_transport_unwrap() {
        let identity = EnclaveIdentity::generate();
        let sealed = identity.public_encryption_key().seal(b"keys").unwrap();

        assert_eq!(identity.decrypt_key_transport(&sealed).unwrap().as_slice(), b"keys");
    }

    #[test]
    fn test_key_transport_failure_is_generic() {
        let identity = EnclaveIdentity::generate();
        let foreign = EnclaveIdentity::generate()
            .public_encryption_key()
            .seal(b"keys")
            .unwrap();

        assert!(matches!(
            identity.decrypt_key_transport(&foreign),
            Err(EccError::KeyTransportDecrypt)
        ));
        assert!(matches!(
            identity.decrypt_key_transport(b"garbage"),
            Err(EccError::KeyTransportDecrypt)
        ));
    }

    #[test]
    fn test_signature_verifies() {
        let identity = EnclaveIdentity::generate();
        let signature = identity.sign(b"payload").unwrap();

        assert!(identity.public_signing_key().verify(b"payload", &signature).is_ok());
    }
}
