//! Trusted entry point for one chaincode invocation.

use crate::budget::CapacityBudget;
use crate::chaincode::Chaincode;
use crate::config::EnclaveConfig;
use crate::context::StateShim;
use crate::error::{EccError, EccResult};
use crate::identity::EnclaveIdentity;
use crate::key_transport::KeyTransportResolver;
use crate::request::RequestPipeline;
use crate::response::{ResponseInputs, ResponsePipeline};
use crate::signer::ResponseSigner;
use ecc_types::ChaincodeRequestMessage;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Status returned across the enclave boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum EcallStatus {
    Success = 0,
    Failure = 1,
}

impl EcallStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Result of [`ChaincodeEnclave::invoke`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcallOutcome {
    pub status: EcallStatus,
    /// Bytes of the signed response written to the caller's buffer.
    /// Always zero on failure.
    pub bytes_written: usize,
}

impl EcallOutcome {
    fn success(bytes_written: usize) -> Self {
        Self {
            status: EcallStatus::Success,
            bytes_written,
        }
    }

    fn failure() -> Self {
        Self {
            status: EcallStatus::Failure,
            bytes_written: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == EcallStatus::Success
    }
}

/// An enclave hosting one chaincode.
///
/// Invocations share nothing but the read-only identity, chaincode and
/// configuration, so `invoke` may be called from many threads at once.
pub struct ChaincodeEnclave<C> {
    identity: Arc<EnclaveIdentity>,
    chaincode: C,
    config: EnclaveConfig,
}

impl<C: Chaincode> ChaincodeEnclave<C> {
    pub fn new(identity: Arc<EnclaveIdentity>, chaincode: C, config: EnclaveConfig) -> EccResult<Self> {
        config.validate()?;
        info!(
            enclave_id = %identity.id(),
            max_response_size = config.max_response_size,
            response_reserve = config.response_reserve,
            "Chaincode enclave ready"
        );
        Ok(Self {
            identity,
            chaincode,
            config,
        })
    }

    pub fn identity(&self) -> &Arc<EnclaveIdentity> {
        &self.identity
    }

    pub fn config(&self) -> &EnclaveConfig {
        &self.config
    }

    /// Process one invocation.
    ///
    /// `output.len()` is the caller's capacity. On success the front of
    /// `output` holds a `SignedChaincodeResponseMessage`. On failure the
    /// reported length is zero and no detail leaves the enclave.
    pub fn invoke(
        &self,
        signed_proposal: &[u8],
        request_message: &[u8],
        output: &mut [u8],
        shim: &dyn StateShim,
    ) -> EcallOutcome {
        match self.try_invoke(signed_proposal, request_message, output, shim) {
            Ok(written) => EcallOutcome::success(written),
            Err(e) => {
                warn!(
                    enclave_id = %self.identity.id(),
                    kind = %e.kind(),
                    error = %e,
                    "Chaincode invocation failed"
                );
                EcallOutcome::failure()
            }
        }
    }

    /// Same as [`invoke`](Self::invoke) but with the failure cause.
    pub fn try_invoke(
        &self,
        signed_proposal: &[u8],
        request_message: &[u8],
        output: &mut [u8],
        shim: &dyn StateShim,
    ) -> EccResult<usize> {
        let request: ChaincodeRequestMessage =
            ecc_protocol::decode(request_message).map_err(EccError::RequestMessageDecode)?;

        if request.encrypted_request.is_empty() {
            return Err(EccError::EmptyField("encrypted_request"));
        }
        if request.encrypted_key_transport_message.is_empty() {
            return Err(EccError::EmptyField("encrypted_key_transport_message"));
        }

        let keys = KeyTransportResolver::new(&self.identity)
            .resolve(&request.encrypted_key_transport_message)?;

        let mut ctx = RequestPipeline::open(&request.encrypted_request, &keys.request_key, shim)?;

        let budget = CapacityBudget::compute(output.len(), &self.config)?;
        let mut chaincode_output = zeroize::Zeroizing::new(budget.allocate());

        // a panic must not unwind across the enclave boundary
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.chaincode.invoke(&mut chaincode_output, &mut ctx)
        }))
        .map_err(|_| EccError::ChaincodePanicked)?;
        let written = budget.check(&outcome)?;
        debug!(
            function = %ctx.function(),
            status = outcome.status,
            written,
            "Chaincode returned"
        );

        let rwset = ctx.into_read_write_set();
        let response = ResponsePipeline::assemble(ResponseInputs {
            output: &chaincode_output[..written],
            chaincode_status: outcome.status,
            response_key: &keys.response_key,
            request_message_bytes: request_message,
            signed_proposal_bytes: signed_proposal,
            read_write_set: &rwset,
            enclave_id: self.identity.id(),
        })?;

        ResponseSigner::new(&self.identity).sign_into(response, output)
    }
}
