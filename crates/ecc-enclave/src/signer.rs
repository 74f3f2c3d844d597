//! Signing of the response envelope.

use crate::error::EccResult;
use crate::identity::EnclaveIdentity;
use ecc_types::SignedChaincodeResponseMessage;
use tracing::debug;

/// Signs an encoded `ChaincodeResponseMessage` and writes the signed
/// envelope to the caller's buffer.
pub struct ResponseSigner<'a> {
    identity: &'a EnclaveIdentity,
}

impl<'a> ResponseSigner<'a> {
    pub fn new(identity: &'a EnclaveIdentity) -> Self {
        Self { identity }
    }

    /// Returns the number of bytes written to `output`. On error nothing
    /// has been written.
    pub fn sign_into(&self, response_message: Vec<u8>, output: &mut [u8]) -> EccResult<usize> {
        let signature = self.identity.sign(&response_message)?;

        let signed = SignedChaincodeResponseMessage {
            chaincode_response_message: response_message,
            signature,
        };

        let written = ecc_protocol::encode_into(&signed, output)?;
        debug!(written, capacity = output.len(), "Signed response written");
        Ok(written)
    }
}
