//! # ECC Enclave
//!
//! Trusted side of a confidential chaincode invocation.
//!
//! A client encrypts its chaincode arguments under a fresh symmetric key and
//! wraps that key (plus a response key) to the enclave's public encryption
//! key. The enclave unwraps the keys, runs the chaincode over the decrypted
//! arguments, encrypts the result for the client and signs a response that
//! binds the result to the exact request, the endorsement proposal and the
//! ledger accesses made.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     ChaincodeEnclave::invoke                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  request_message ──▶ decode ──▶ KeyTransportResolver ──▶ TransportKeys  │
//! │                        │           (EnclaveIdentity)        │    │      │
//! │                        ▼                                    │    │      │
//! │                   RequestPipeline ◀─────── request_key ─────┘    │      │
//! │                        │                                         │      │
//! │                        ▼                                         │      │
//! │   CapacityBudget ─▶ Chaincode::invoke(output, ctx) ◀──▶ StateShim│      │
//! │                        │                                         │      │
//! │                        ▼                                         │      │
//! │                   ResponsePipeline ◀────── response_key ─────────┘      │
//! │                        │   (signed_proposal, request hash, rw-set)      │
//! │                        ▼                                                │
//! │                   ResponseSigner ──▶ SignedChaincodeResponseMessage     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure aborts the invocation: the caller sees
//! [`EcallStatus::Failure`] and a zero length, and all per-invocation
//! secrets are wiped as they go out of scope. A business-level failure is
//! not a pipeline failure; its status travels inside the signed response.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ecc_enclave::{ChaincodeEnclave, EnclaveConfig, EnclaveIdentity};
//! use ecc_enclave::mock::{AssetChaincode, MemoryShim};
//! use std::sync::Arc;
//!
//! let identity = Arc::new(EnclaveIdentity::generate());
//! let enclave = ChaincodeEnclave::new(identity, AssetChaincode::new(), EnclaveConfig::from_env())?;
//!
//! let mut output = vec![0u8; 64 * 1024];
//! let outcome = enclave.invoke(&signed_proposal, &request_message, &mut output, &MemoryShim::new());
//! let response = &output[..outcome.bytes_written];
//! ```

pub mod attestation;
pub mod budget;
pub mod chaincode;
pub mod config;
pub mod context;
pub mod enclave;
pub mod error;
pub mod identity;
pub mod key_transport;
pub mod request;
pub mod response;
pub mod signer;

#[cfg(feature = "mock")]
pub mod mock;

pub use attestation::{
    Attestation, AttestationError, AttestationProvider, AttestationResult, AttestationType,
    EnclaveCredentials, TargetInfo,
};
pub use budget::CapacityBudget;
pub use chaincode::{write_output, Chaincode, InvokeOutcome};
pub use config::EnclaveConfig;
pub use context::{
    create_composite_key, EmptyState, InvocationContext, ReadWriteSet, StateRead, StateShim,
    StateWrite,
};
pub use enclave::{ChaincodeEnclave, EcallOutcome, EcallStatus};
pub use error::{EccError, EccResult, ErrorKind};
pub use identity::EnclaveIdentity;
pub use key_transport::{KeyTransportResolver, TransportKeys};
pub use request::RequestPipeline;
pub use response::{ResponseInputs, ResponsePipeline};
pub use signer::ResponseSigner;

#[cfg(feature = "mock")]
pub use mock::{AssetChaincode, MemoryShim, MockAttestationProvider};
