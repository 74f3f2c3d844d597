//! Wire messages exchanged between a client, the enclave host and the
//! enclave.
//!
//! All messages are Protocol Buffers messages derived with `prost`, so they
//! are field-tagged and can evolve without breaking older peers. Field
//! numbers follow the deployed `fpc.proto` schema.
//!
//! ```text
//! client ──ChaincodeRequestMessage──▶ enclave
//!          ├─ encrypted_key_transport_message  (KeyTransportMessage, ECIES)
//!          └─ encrypted_request                (CleartextChaincodeRequest, AEAD)
//!
//! enclave ──SignedChaincodeResponseMessage──▶ client
//!          ├─ chaincode_response_message       (ChaincodeResponseMessage bytes)
//!          └─ signature                        (over exactly those bytes)
//! ```

// ========== Core Modules ==========
pub mod request;
pub mod response;
pub mod rwset;

pub use request::{
    ChaincodeInput, ChaincodeRequestMessage, CleartextChaincodeRequest, KeyTransportMessage,
};
pub use response::{ChaincodeResponseMessage, SignedChaincodeResponseMessage, SignedProposal};
pub use rwset::{FpcKvSet, KvRead, KvRwSet, KvWrite};

/// Status reported by business logic that completed normally.
pub const CHAINCODE_STATUS_OK: i32 = 0;
