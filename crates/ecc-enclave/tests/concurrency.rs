//! Concurrent invocations against one shared enclave.

#![cfg(feature = "mock")]

use ecc_client::ClientSession;
use ecc_enclave::mock::{AssetChaincode, MemoryShim};
use ecc_enclave::{ChaincodeEnclave, EnclaveConfig, EnclaveIdentity};
use std::sync::Arc;

const CAPACITY: usize = 16 * 1024;

fn funded_shim(accounts: usize) -> MemoryShim {
    let shim = MemoryShim::new();
    for i in 0..accounts {
        shim.insert(AssetChaincode::balance_key(&format!("account-{i}")), b"100".to_vec());
    }
    shim
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_invocations_are_isolated() {
    let identity = Arc::new(EnclaveIdentity::generate());
    let enclave = Arc::new(
        ChaincodeEnclave::new(identity.clone(), AssetChaincode::new(), EnclaveConfig::default())
            .unwrap(),
    );
    let shim = Arc::new(funded_shim(16));
    let proposal = Arc::new(ClientSession::signed_proposal(b"proposal", b"").unwrap());

    let mut handles = Vec::new();
    for i in 0..16 {
        let enclave = enclave.clone();
        let identity = identity.clone();
        let shim = shim.clone();
        let proposal = proposal.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let account = format!("account-{i}");
            let session = ClientSession::new(identity.public_encryption_key());
            let request = session.build_request(["get", account.as_str()]).unwrap();

            let mut output = vec![0u8; CAPACITY];
            let outcome = enclave.invoke(&proposal, &request, &mut output, shim.as_ref());
            assert!(outcome.is_success());

            let verified = session
                .validate_response(
                    &output[..outcome.bytes_written],
                    &identity.public_signing_key(),
                    &request,
                )
                .unwrap();
            (account, verified)
        }));
    }

    for handle in handles {
        let (account, verified) = handle.await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&verified.output).unwrap();

        assert!(verified.is_ok());
        assert_eq!(json["account"], account.as_str());
        assert_eq!(json["balance"], 100);
        assert_eq!(verified.read_write_set.reads().len(), 1);
        assert_eq!(
            verified.read_write_set.reads()[0].key,
            AssetChaincode::balance_key(&account)
        );
    }
}

#[test]
fn test_sessions_cannot_read_each_other() {
    let identity = Arc::new(EnclaveIdentity::generate());
    let enclave =
        ChaincodeEnclave::new(identity.clone(), AssetChaincode::new(), EnclaveConfig::default())
            .unwrap();
    let shim = funded_shim(1);
    let proposal = ClientSession::signed_proposal(b"proposal", b"").unwrap();

    let alice = ClientSession::new(identity.public_encryption_key());
    let mallory = ClientSession::new(identity.public_encryption_key());
    let request = alice.build_request(["get", "account-0"]).unwrap();

    let mut output = vec![0u8; CAPACITY];
    let outcome = enclave.invoke(&proposal, &request, &mut output, &shim);
    let signed = &output[..outcome.bytes_written];

    assert!(alice
        .validate_response(signed, &identity.public_signing_key(), &request)
        .is_ok());
    assert!(mallory
        .validate_response(signed, &identity.public_signing_key(), &request)
        .is_err());
}
