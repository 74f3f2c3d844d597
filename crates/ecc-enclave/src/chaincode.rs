//! Business-logic entry point.

use crate::context::InvocationContext;
use ecc_types::CHAINCODE_STATUS_OK;

/// What the business logic reports back after one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvokeOutcome {
    /// Bytes of `output` holding the result
    pub bytes_written: usize,
    /// Zero for success, anything else is a business-level failure
    pub status: i32,
}

impl InvokeOutcome {
    pub fn ok(bytes_written: usize) -> Self {
        Self {
            bytes_written,
            status: CHAINCODE_STATUS_OK,
        }
    }

    pub fn failed(status: i32, bytes_written: usize) -> Self {
        Self {
            bytes_written,
            status,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == CHAINCODE_STATUS_OK
    }
}

/// Chaincode hosted by the enclave.
///
/// `output` is sized by the enclave; the implementation writes its result
/// into the front of it and reports how much it used. All ledger access
/// goes through `ctx`.
pub trait Chaincode: Send + Sync {
    fn invoke(&self, output: &mut [u8], ctx: &mut InvocationContext<'_>) -> InvokeOutcome;
}

impl<F> Chaincode for F
where
    F: Fn(&mut [u8], &mut InvocationContext<'_>) -> InvokeOutcome + Send + Sync,
{
    fn invoke(&self, output: &mut [u8], ctx: &mut InvocationContext<'_>) -> InvokeOutcome {
        self(output, ctx)
    }
}

/// Copy `bytes` into the front of `output`. Returns `None` when they do
/// not fit.
pub fn write_output(output: &mut [u8], bytes: &[u8]) -> Option<usize> {
    let dst = output.get_mut(..bytes.len())?;
    dst.copy_from_slice(bytes);
    Some(bytes.len())
}
