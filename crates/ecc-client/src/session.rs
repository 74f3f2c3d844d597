//! One client-side invocation.

use crate::error::{ClientError, ClientResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ecc_keys::{EncryptionPublicKey, MessageHash, SigningPublicKey, SymmetricKey};
use ecc_types::{
    ChaincodeRequestMessage, ChaincodeResponseMessage, CleartextChaincodeRequest, FpcKvSet,
    KeyTransportMessage, SignedChaincodeResponseMessage, SignedProposal, CHAINCODE_STATUS_OK,
};
use tracing::debug;
use zeroize::Zeroizing;

/// Response that passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedResponse {
    /// Decrypted business-logic output
    pub output: Vec<u8>,
    /// The base64 text the enclave encrypted
    pub encoded_output: String,
    pub status: i32,
    pub read_write_set: FpcKvSet,
    pub proposal: Option<SignedProposal>,
    pub enclave_id: String,
}

impl VerifiedResponse {
    pub fn is_ok(&self) -> bool {
        self.status == CHAINCODE_STATUS_OK
    }
}

/// Keys and target enclave for a single invocation.
///
/// A session generates its own request and response keys; build one
/// session per request.
#[derive(Debug)]
pub struct ClientSession {
    enclave_key: EncryptionPublicKey,
    request_key: SymmetricKey,
    response_key: SymmetricKey,
}

impl ClientSession {
    pub fn new(enclave_key: EncryptionPublicKey) -> Self {
        Self::with_keys(enclave_key, SymmetricKey::generate(), SymmetricKey::generate())
    }

    pub fn with_keys(
        enclave_key: EncryptionPublicKey,
        request_key: SymmetricKey,
        response_key: SymmetricKey,
    ) -> Self {
        Self {
            enclave_key,
            request_key,
            response_key,
        }
    }

    pub fn request_key(&self) -> &SymmetricKey {
        &self.request_key
    }

    pub fn response_key(&self) -> &SymmetricKey {
        &self.response_key
    }

    /// Encode and encrypt `args` into `ChaincodeRequestMessage` bytes.
    pub fn build_request<I, S>(&self, args: I) -> ClientResult<Vec<u8>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let cleartext = Zeroizing::new(
            ecc_protocol::encode(&CleartextChaincodeRequest::from_args(args))
                .map_err(ClientError::Encode)?,
        );
        let encrypted_request = self
            .request_key
            .seal(&cleartext)
            .map_err(ClientError::Encrypt)?;

        let transport = Zeroizing::new(
            ecc_protocol::encode(&KeyTransportMessage {
                request_encryption_key: self.request_key.as_bytes().to_vec(),
                response_encryption_key: self.response_key.as_bytes().to_vec(),
            })
            .map_err(ClientError::Encode)?,
        );
        let encrypted_key_transport_message = self
            .enclave_key
            .seal(&transport)
            .map_err(ClientError::Encrypt)?;

        let bytes = ecc_protocol::encode(&ChaincodeRequestMessage {
            encrypted_request,
            encrypted_key_transport_message,
        })
        .map_err(ClientError::Encode)?;

        debug!(size = bytes.len(), "Chaincode request built");
        Ok(bytes)
    }

    /// Encode a `SignedProposal` around `proposal_bytes`.
    pub fn signed_proposal(proposal_bytes: &[u8], signature: &[u8]) -> ClientResult<Vec<u8>> {
        ecc_protocol::encode(&SignedProposal {
            proposal_bytes: proposal_bytes.to_vec(),
            signature: signature.to_vec(),
        })
        .map_err(ClientError::Encode)
    }

    /// Check a signed response against the enclave's signing key and the
    /// request this session sent, then decrypt its output.
    pub fn validate_response(
        &self,
        signed_response: &[u8],
        enclave_signing_key: &SigningPublicKey,
        request_message: &[u8],
    ) -> ClientResult<VerifiedResponse> {
        let signed: SignedChaincodeResponseMessage =
            ecc_protocol::decode(signed_response).map_err(ClientError::Decode)?;

        enclave_signing_key
            .verify(&signed.chaincode_response_message, &signed.signature)
            .map_err(|_| ClientError::InvalidSignature)?;

        let response: ChaincodeResponseMessage =
            ecc_protocol::decode(&signed.chaincode_response_message)
                .map_err(ClientError::Decode)?;

        let expected_id = enclave_signing_key.fingerprint().to_hex_upper();
        if response.enclave_id != expected_id {
            return Err(ClientError::EnclaveIdMismatch {
                expected: expected_id,
                got: response.enclave_id,
            });
        }

        if response.chaincode_request_message_hash != MessageHash::digest(request_message).to_vec() {
            return Err(ClientError::RequestHashMismatch);
        }

        let plaintext = self
            .response_key
            .open(&response.encrypted_response)
            .map_err(|_| ClientError::ResponseDecrypt)?;
        let encoded_output =
            String::from_utf8(plaintext).map_err(|_| ClientError::ResponseDecrypt)?;
        let output = STANDARD.decode(&encoded_output)?;

        debug!(
            enclave_id = %response.enclave_id,
            status = response.chaincode_status,
            output_len = output.len(),
            "Response validated"
        );

        Ok(VerifiedResponse {
            output,
            encoded_output,
            status: response.chaincode_status,
            read_write_set: response.fpc_rw_set.unwrap_or_default(),
            proposal: response.proposal,
            enclave_id: response.enclave_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecc_keys::{EncryptionKeyPair, SigningKeyPair};

    #[test]
    fn test_build_request_opens_with_enclave_key() {
        let enclave = EncryptionKeyPair::generate();
        let session = ClientSession::new(enclave.public_key());

        let bytes = session.build_request(["get", "alice"]).unwrap();
        let request: ChaincodeRequestMessage = ecc_protocol::decode(&bytes).unwrap();

        let transport_bytes = enclave.open(&request.encrypted_key_transport_message).unwrap();
        let transport: KeyTransportMessage = ecc_protocol::decode(&transport_bytes).unwrap();
        assert_eq!(transport.request_encryption_key, session.request_key().as_bytes());

        let cleartext = session.request_key().open(&request.encrypted_request).unwrap();
        let cleartext: CleartextChaincodeRequest = ecc_protocol::decode(&cleartext).unwrap();
        assert_eq!(cleartext.input.unwrap().args, vec![b"get".to_vec(), b"alice".to_vec()]);
    }

    #[test]
    fn test_sessions_use_fresh_keys() {
        let enclave = EncryptionKeyPair::generate();
        let a = ClientSession::new(enclave.public_key());
        let b = ClientSession::new(enclave.public_key());

        assert_ne!(a.request_key(), b.request_key());
        assert_ne!(a.response_key(), a.request_key());
    }

    fn respond(
        session: &ClientSession,
        signer: &SigningKeyPair,
        request: &[u8],
        output: &[u8],
    ) -> Vec<u8> {
        let message = ChaincodeResponseMessage {
            encrypted_response: session
                .response_key()
                .seal(STANDARD.encode(output).as_bytes())
                .unwrap(),
            fpc_rw_set: None,
            proposal: None,
            chaincode_request_message_hash: MessageHash::digest(request).to_vec(),
            enclave_id: signer.public_key().fingerprint().to_hex_upper(),
            chaincode_status: 0,
        };
        let bytes = ecc_protocol::encode(&message).unwrap();
        ecc_protocol::encode(&SignedChaincodeResponseMessage {
            signature: signer.sign(&bytes).unwrap(),
            chaincode_response_message: bytes,
        })
        .unwrap()
    }

    #[test]
    fn test_validate_response() {
        let session = ClientSession::new(EncryptionKeyPair::generate().public_key());
        let signer = SigningKeyPair::generate();
        let request = session.build_request(["get"]).unwrap();
        let signed = respond(&session, &signer, &request, b"hello");

        let verified = session
            .validate_response(&signed, &signer.public_key(), &request)
            .unwrap();
        assert_eq!(verified.output, b"hello");
        assert_eq!(verified.encoded_output, "aGVsbG8=");
        assert!(verified.is_ok());
    }

    #[test]
    fn test_wrong_signer_rejected() {
        let session = ClientSession::new(EncryptionKeyPair::generate().public_key());
        let signer = SigningKeyPair::generate();
        let request = session.build_request(["get"]).unwrap();
        let signed = respond(&session, &signer, &request, b"hello");

        let err = session
            .validate_response(&signed, &SigningKeyPair::generate().public_key(), &request)
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidSignature));
    }

    #[test]
    fn test_other_request_rejected() {
        let session = ClientSession::new(EncryptionKeyPair::generate().public_key());
        let signer = SigningKeyPair::generate();
        let request = session.build_request(["get"]).unwrap();
        let other = session.build_request(["get"]).unwrap();
        let signed = respond(&session, &signer, &request, b"hello");

        let err = session
            .validate_response(&signed, &signer.public_key(), &other)
            .unwrap_err();
        assert!(matches!(err, ClientError::RequestHashMismatch));
    }
}
