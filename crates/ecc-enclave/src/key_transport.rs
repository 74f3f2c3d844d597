//! Recovery of the per-invocation symmetric keys.

use crate::error::{EccError, EccResult};
use crate::identity::EnclaveIdentity;
use ecc_keys::SymmetricKey;
use ecc_types::KeyTransportMessage;
use tracing::debug;

/// Request and response keys for a single invocation.
///
/// Both keys are wiped when this value is dropped.
#[derive(Debug)]
pub struct TransportKeys {
    pub request_key: SymmetricKey,
    pub response_key: SymmetricKey,
}

/// Unwraps `encrypted_key_transport_message` with the enclave's private
/// encryption key.
pub struct KeyTransportResolver<'a> {
    identity: &'a EnclaveIdentity,
}

impl<'a> KeyTransportResolver<'a> {
    pub fn new(identity: &'a EnclaveIdentity) -> Self {
        Self { identity }
    }

    pub fn resolve(&self, encrypted_key_transport: &[u8]) -> EccResult<TransportKeys> {
        let plaintext = self.identity.decrypt_key_transport(encrypted_key_transport)?;

        let message: KeyTransportMessage = ecc_protocol::decode(&plaintext)
            .map_err(|e| EccError::KeyTransportDecode(e.to_string()))?;

        let request_key = SymmetricKey::from_slice(&message.request_encryption_key)
            .map_err(|e| EccError::KeyTransportDecode(format!("request key: {e}")))?;
        let response_key = SymmetricKey::from_slice(&message.response_encryption_key)
            .map_err(|e| EccError::KeyTransportDecode(format!("response key: {e}")))?;

        debug!("Transport keys recovered");
        Ok(TransportKeys {
            request_key,
            response_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seal_keys(identity: &EnclaveIdentity, request: Vec<u8>, response: Vec<u8>) -> Vec<u8> {
        let message = KeyTransportMessage {
            request_encryption_key: request,
            response_encryption_key: response,
        };
        let bytes = ecc_protocol::encode(&message).unwrap();
        identity.public_encryption_key().seal(&bytes).unwrap()
    }

    #[test]
    fn test_resolve_keys() {
        let identity = EnclaveIdentity::generate();
        let sealed = seal_keys(&identity, vec![1u8; 32], vec![2u8; 32]);

        let keys = KeyTransportResolver::new(&identity).resolve(&sealed).unwrap();
        assert_eq!(keys.request_key.as_bytes(), &[1u8; 32]);
        assert_eq!(keys.response_key.as_bytes(), &[2u8; 32]);
    }

    #[test]
    fn test_short_key_rejected() {
        let identity = EnclaveIdentity::generate();
        let sealed = seal_keys(&identity, vec![1u8; 16], vec![2u8; 32]);

        let err = KeyTransportResolver::new(&identity).resolve(&sealed).unwrap_err();
        assert!(matches!(err, EccError::KeyTransportDecode(_)));
    }

    #[test]
    fn test_missing_response_key_rejected() {
        let identity = EnclaveIdentity::generate();
        let sealed = seal_keys(&identity, vec![1u8; 32], Vec::new());

        assert!(KeyTransportResolver::new(&identity).resolve(&sealed).is_err());
    }

    #[test]
    fn test_undecodable_plaintext() {
        let identity = EnclaveIdentity::generate();
        let sealed = identity
            .public_encryption_key()
            .seal(&[0xff, 0xff, 0xff])
            .unwrap();

        let err = KeyTransportResolver::new(&identity).resolve(&sealed).unwrap_err();
        assert!(matches!(err, EccError::KeyTransportDecode(_)));
    }
}
