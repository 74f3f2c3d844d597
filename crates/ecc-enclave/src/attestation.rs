//! Attestation collaborator interface.
//!
//! Attestation binds the enclave's published public keys to a hardware
//! measurement. Report and quote generation are supplied by the hosting
//! platform; this module only defines the shapes the enclave consumes and
//! the binding it asks the platform to attest.
//!
//! ## Binding Flow
//!
//! ```text
//! EnclaveIdentity
//!        │  report_data = SHA-256(encryption_pk || signing_pk)
//!        ▼
//! ┌──────────────────────────────────────────┐
//! │  AttestationProvider (platform)          │
//! │  1. target_info()                        │
//! │  2. local_report(target, report_data)    │
//! │     or remote_quote(report_data, ...)    │
//! └──────────────────────────────────────────┘
//!        │
//!        ▼
//! EnclaveCredentials { enclave_id, keys, attestation }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Attestation errors
#[derive(Debug, Error)]
pub enum AttestationError {
    #[error("Invalid target info")]
    InvalidTargetInfo,

    #[error("Quote generation failed: {0}")]
    QuoteFailed(String),
}

pub type AttestationResult<T> = Result<T, AttestationError>;

/// Attestation type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttestationType {
    /// Simulated attestation for development/testing
    Mock,
    /// Intel SGX EPID quote
    IntelSgxEpid,
    /// Intel SGX DCAP quote
    IntelSgxDcap,
}

impl std::fmt::Display for AttestationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttestationType::Mock => write!(f, "mock"),
            AttestationType::IntelSgxEpid => write!(f, "intel_sgx_epid"),
            AttestationType::IntelSgxDcap => write!(f, "intel_sgx_dcap"),
        }
    }
}

/// Opaque target info of the enclave that will verify a local report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetInfo(pub Vec<u8>);

/// Report or quote produced by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// Type of attestation
    pub attestation_type: AttestationType,

    /// Enclave measurement (MRENCLAVE for SGX)
    pub measurement: [u8; 32],

    /// Report data chosen by the enclave (key binding digest)
    pub report_data: [u8; 32],

    /// Raw report/quote document (format depends on type)
    pub document: Vec<u8>,

    /// Timestamp when attestation was generated (Unix epoch seconds)
    pub timestamp: u64,
}

impl Attestation {
    pub fn new(
        attestation_type: AttestationType,
        measurement: [u8; 32],
        report_data: [u8; 32],
        document: Vec<u8>,
    ) -> Self {
        Self {
            attestation_type,
            measurement,
            report_data,
            document,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    pub fn measurement_hex(&self) -> String {
        hex::encode(self.measurement)
    }

    pub fn is_mock(&self) -> bool {
        self.attestation_type == AttestationType::Mock
    }
}

/// Platform attestation primitives.
///
/// Used once after the identity is created and before any invocation is
/// served.
pub trait AttestationProvider: Send + Sync {
    fn attestation_type(&self) -> AttestationType;

    /// Target info of this enclave, for peers that want a local report.
    fn target_info(&self) -> AttestationResult<TargetInfo>;

    /// Local report for the enclave described by `target`.
    fn local_report(
        &self,
        target: &TargetInfo,
        report_data: [u8; 32],
    ) -> AttestationResult<Attestation>;

    /// Quote for remote verification.
    fn remote_quote(
        &self,
        report_data: [u8; 32],
        spid: &[u8],
        sig_rl: &[u8],
    ) -> AttestationResult<Attestation>;

    /// Extended EPID group id of the platform.
    fn group_id(&self) -> AttestationResult<u32>;
}

/// Public keys of one enclave together with the attestation that binds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnclaveCredentials {
    pub enclave_id: String,
    /// SEC1 uncompressed P-256 key used for key transport
    pub encryption_key: Vec<u8>,
    /// SEC1 uncompressed P-256 key used to verify responses
    pub signing_key: Vec<u8>,
    pub attestation: Attestation,
}

impl EnclaveCredentials {
    /// Digest an attestation must carry in its report data for these keys.
    pub fn binding_digest(encryption_key: &[u8], signing_key: &[u8]) -> [u8; 32] {
        *ecc_keys::MessageHash::digest_parts(&[encryption_key, signing_key]).as_bytes()
    }

    /// Whether the attestation's report data commits to the published keys.
    ///
    /// This is not a verification of the attestation itself.
    pub fn is_bound(&self) -> bool {
        self.attestation.report_data
            == Self::binding_digest(&self.encryption_key, &self.signing_key)
    }
}
