//! Enclave configuration.

use crate::error::{EccError, EccResult};
use serde::{Deserialize, Serialize};

/// Bytes held back from the caller's buffer for the envelope, signature and
/// protobuf framing around the encrypted output.
pub const DEFAULT_RESPONSE_RESERVE: usize = 1024;

/// Largest business-logic output buffer the enclave will allocate.
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 1024 * 1024;

/// Enclave configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnclaveConfig {
    /// Upper bound on the business-logic output buffer
    pub max_response_size: usize,

    /// Envelope overhead reserved out of the caller capacity
    pub response_reserve: usize,
}

impl Default for EnclaveConfig {
    fn default() -> Self {
        Self {
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            response_reserve: DEFAULT_RESPONSE_RESERVE,
        }
    }
}

impl EnclaveConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_response_size = std::env::var("ECC_MAX_RESPONSE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_response_size);

        let response_reserve = std::env::var("ECC_RESPONSE_RESERVE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.response_reserve);

        Self {
            max_response_size,
            response_reserve,
        }
    }

    pub fn with_max_response_size(mut self, bytes: usize) -> Self {
        self.max_response_size = bytes;
        self
    }

    pub fn with_response_reserve(mut self, bytes: usize) -> Self {
        self.response_reserve = bytes;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> EccResult<()> {
        if self.max_response_size == 0 {
            return Err(EccError::InvalidConfig(
                "max_response_size must be positive".to_string(),
            ));
        }
        if self.response_reserve == 0 {
            return Err(EccError::InvalidConfig(
                "response_reserve must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
