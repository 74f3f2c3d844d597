//! Mock collaborators for development and testing.
//!
//! - [`MockAttestationProvider`]: simulated reports and quotes
//! - [`MemoryShim`]: in-memory world state
//! - [`AssetChaincode`]: sample business logic over that state

mod asset;

pub use asset::{
    AssetChaincode, ASSET_STATUS_BAD_REQUEST, ASSET_STATUS_INSUFFICIENT_FUNDS,
    ASSET_STATUS_NOT_FOUND, ASSET_STATUS_OUTPUT_TOO_SMALL,
};

use crate::attestation::{
    Attestation, AttestationError, AttestationProvider, AttestationResult, AttestationType, TargetInfo,
};
use crate::context::{ReadWriteSet, StateShim};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Mock enclave measurement (constant for testing)
pub const MOCK_MEASUREMENT: [u8; 32] = [
    0x4d, 0x4f, 0x43, 0x4b, // "MOCK"
    0x5f, 0x45, 0x43, 0x43, // "_ECC"
    0x5f, 0x56, 0x31, 0x00, // "_V1\0"
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

const MOCK_GROUP_ID: u32 = 0;

/// Attestation provider that needs no hardware.
///
/// Documents are a readable description of what was attested. They carry
/// no cryptographic weight.
#[derive(Debug, Default)]
pub struct MockAttestationProvider {
    reports_issued: AtomicU64,
}

impl MockAttestationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports_issued(&self) -> u64 {
        self.reports_issued.load(Ordering::Relaxed)
    }

    fn issue(&self, kind: &str, report_data: [u8; 32]) -> Attestation {
        self.reports_issued.fetch_add(1, Ordering::Relaxed);
        let document = format!("{kind}:{}", hex::encode(report_data)).into_bytes();
        Attestation::new(AttestationType::Mock, MOCK_MEASUREMENT, report_data, document)
    }
}

impl AttestationProvider for MockAttestationProvider {
    fn attestation_type(&self) -> AttestationType {
        AttestationType::Mock
    }

    fn target_info(&self) -> AttestationResult<TargetInfo> {
        Ok(TargetInfo(MOCK_MEASUREMENT.to_vec()))
    }

    fn local_report(
        &self,
        target: &TargetInfo,
        report_data: [u8; 32],
    ) -> AttestationResult<Attestation> {
        if target.0.is_empty() {
            return Err(AttestationError::InvalidTargetInfo);
        }
        debug!(report_data = %hex::encode(report_data), "Issuing mock local report");
        Ok(self.issue("mock-report", report_data))
    }

    fn remote_quote(
        &self,
        report_data: [u8; 32],
        spid: &[u8],
        _sig_rl: &[u8],
    ) -> AttestationResult<Attestation> {
        if spid.is_empty() {
            return Err(AttestationError::QuoteFailed("missing SPID".to_string()));
        }
        debug!(report_data = %hex::encode(report_data), "Issuing mock quote");
        Ok(self.issue("mock-quote", report_data))
    }

    fn group_id(&self) -> AttestationResult<u32> {
        Ok(MOCK_GROUP_ID)
    }
}

/// In-memory world state.
#[derive(Debug, Default)]
pub struct MemoryShim {
    state: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryShim {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.state.write().insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.state.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().is_empty()
    }

    /// Commit the writes of an invocation, in order.
    pub fn apply(&self, rwset: &ReadWriteSet) {
        let mut state = self.state.write();
        for write in rwset.writes() {
            match &write.value {
                Some(value) => {
                    state.insert(write.key.clone(), value.clone());
                }
                None => {
                    state.remove(&write.key);
                }
            }
        }
        debug!(writes = rwset.writes().len(), "Applied write set");
    }
}

impl StateShim for MemoryShim {
    fn get_state(&self, key: &str) -> Option<Vec<u8>> {
        self.get(key)
    }
}
