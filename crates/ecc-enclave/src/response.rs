//! Response envelope assembly.

use crate::context::ReadWriteSet;
use crate::error::{EccError, EccResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ecc_keys::{MessageHash, SymmetricKey};
use ecc_types::{ChaincodeResponseMessage, SignedProposal};
use tracing::{debug, warn};

/// Everything the envelope is built from.
pub struct ResponseInputs<'a> {
    /// Raw business-logic output, exactly `bytes_written` long
    pub output: &'a [u8],
    pub chaincode_status: i32,
    pub response_key: &'a SymmetricKey,
    /// The request message exactly as received
    pub request_message_bytes: &'a [u8],
    pub signed_proposal_bytes: &'a [u8],
    pub read_write_set: &'a ReadWriteSet,
    pub enclave_id: &'a str,
}

pub struct ResponsePipeline;

impl ResponsePipeline {
    /// Build and encode the unsigned `ChaincodeResponseMessage`.
    pub fn assemble(inputs: ResponseInputs<'_>) -> EccResult<Vec<u8>> {
        let encoded_output = STANDARD.encode(inputs.output);

        let encrypted_response = inputs
            .response_key
            .seal(encoded_output.as_bytes())
            .map_err(|e| {
                warn!(error = %e, "Response encryption failed");
                EccError::ResponseEncrypt
            })?;

        let request_hash = MessageHash::digest(inputs.request_message_bytes);

        let proposal: SignedProposal = ecc_protocol::decode(inputs.signed_proposal_bytes)
            .map_err(EccError::ProposalDecode)?;
        if proposal.proposal_bytes.is_empty() {
            return Err(EccError::EmptyField("proposal"));
        }

        let message = ChaincodeResponseMessage {
            encrypted_response,
            fpc_rw_set: Some(inputs.read_write_set.to_proto()),
            proposal: Some(proposal),
            chaincode_request_message_hash: request_hash.to_vec(),
            enclave_id: inputs.enclave_id.to_string(),
            chaincode_status: inputs.chaincode_status,
        };

        let bytes = ecc_protocol::encode(&message)?;
        debug!(
            size = bytes.len(),
            request_hash = %request_hash,
            "Response message assembled"
        );
        Ok(bytes)
    }
}
