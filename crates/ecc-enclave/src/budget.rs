//! Output capacity budgeting.
//!
//! The caller supplies one buffer for the whole signed response. Business
//! logic gets three quarters of it, less a fixed reserve, and never more
//! than the configured maximum. The remainder absorbs authenticated
//! encryption, base64 expansion, the envelope and the signature.

use crate::chaincode::InvokeOutcome;
use crate::config::EnclaveConfig;
use crate::error::{EccError, EccResult};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityBudget {
    output_capacity: usize,
}

impl CapacityBudget {
    pub fn compute(caller_capacity: usize, config: &EnclaveConfig) -> EccResult<Self> {
        let scaled = caller_capacity / 4 * 3;
        let available = scaled
            .checked_sub(config.response_reserve)
            .filter(|n| *n > 0)
            .ok_or(EccError::CapacityBudget {
                caller_capacity,
                reserve: config.response_reserve,
            })?;

        let output_capacity = available.min(config.max_response_size);
        debug!(caller_capacity, output_capacity, "Output budget computed");

        Ok(Self { output_capacity })
    }

    pub fn output_capacity(&self) -> usize {
        self.output_capacity
    }

    /// Zeroed output buffer of exactly the budgeted size.
    pub fn allocate(&self) -> Vec<u8> {
        vec![0u8; self.output_capacity]
    }

    /// Validate what the business logic claims to have written.
    pub fn check(&self, outcome: &InvokeOutcome) -> EccResult<usize> {
        if outcome.bytes_written > self.output_capacity {
            return Err(EccError::CapacityExceeded {
                written: outcome.bytes_written,
                capacity: self.output_capacity,
            });
        }
        Ok(outcome.bytes_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_formula() {
        let config = EnclaveConfig::default();
        let budget = CapacityBudget::compute(8192, &config).unwrap();

        assert_eq!(budget.output_capacity(), 8192 / 4 * 3 - 1024);
        assert_eq!(budget.allocate().len(), 5120);
    }

    #[test]
    fn test_budget_truncates_before_scaling() {
        let config = EnclaveConfig::default();
        let budget = CapacityBudget::compute(4099, &config).unwrap();

        assert_eq!(budget.output_capacity(), 1024 * 3 - 1024);
    }

    #[test]
    fn test_budget_exhausted_by_reserve() {
        let config = EnclaveConfig::default();

        // 1365 / 4 * 3 == 1023
        assert!(CapacityBudget::compute(1365, &config).is_err());
        // 1368 / 4 * 3 == 1026
        assert!(CapacityBudget::compute(1368, &config).is_ok());
        assert!(CapacityBudget::compute(0, &config).is_err());

        // exactly the reserve leaves nothing
        let config = EnclaveConfig::default().with_response_reserve(1023);
        assert!(matches!(
            CapacityBudget::compute(1364, &config),
            Err(EccError::CapacityBudget { .. })
        ));
    }

    #[test]
    fn test_budget_clamped_to_max() {
        let config = EnclaveConfig::default().with_max_response_size(4096);
        let budget = CapacityBudget::compute(10 * 1024 * 1024, &config).unwrap();

        assert_eq!(budget.output_capacity(), 4096);
    }

    #[test]
    fn test_check_rejects_overreport() {
        let budget = CapacityBudget::compute(8192, &EnclaveConfig::default()).unwrap();

        assert_eq!(budget.check(&InvokeOutcome::ok(5120)).unwrap(), 5120);
        assert!(matches!(
            budget.check(&InvokeOutcome::ok(5121)),
            Err(EccError::CapacityExceeded { written: 5121, capacity: 5120 })
        ));
    }
}
