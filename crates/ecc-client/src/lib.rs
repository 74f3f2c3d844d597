//! Client SDK for enclave chaincode invocation.
//!
//! Builds encrypted `ChaincodeRequestMessage`s for a target enclave and
//! validates the signed responses it returns: signature, enclave id,
//! request binding, then decryption of the output.

pub mod error;
pub mod session;

pub use error::{ClientError, ClientResult};
pub use session::{ClientSession, VerifiedResponse};
