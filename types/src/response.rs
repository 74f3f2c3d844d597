//! Enclave → client messages.

use crate::rwset::FpcKvSet;

/// Client proposal echoed back inside the response.
#[derive(Clone, PartialEq, prost::Message)]
pub struct SignedProposal {
    #[prost(bytes = "vec", tag = "1")]
    pub proposal_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub signature: Vec<u8>,
}

/// Response body assembled inside the enclave.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ChaincodeResponseMessage {
    /// AEAD ciphertext of the base64-encoded business output
    #[prost(bytes = "vec", tag = "1")]
    pub encrypted_response: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub fpc_rw_set: Option<FpcKvSet>,
    #[prost(message, optional, tag = "3")]
    pub proposal: Option<SignedProposal>,
    /// SHA-256 of the raw `ChaincodeRequestMessage` bytes
    #[prost(bytes = "vec", tag = "4")]
    pub chaincode_request_message_hash: Vec<u8>,
    #[prost(string, tag = "5")]
    pub enclave_id: String,
    /// Status the business logic reported; zero means success
    #[prost(int32, tag = "6")]
    pub chaincode_status: i32,
}

/// The only artifact handed back across the trust boundary.
#[derive(Clone, PartialEq, prost::Message)]
pub struct SignedChaincodeResponseMessage {
    #[prost(bytes = "vec", tag = "1")]
    pub chaincode_response_message: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub signature: Vec<u8>,
}
