//! Identity command handler

use crate::config::Config;
use anyhow::Result;
use colored::Colorize;
use ecc_enclave::{EnclaveIdentity, MockAttestationProvider};

pub fn handle(_config: &Config) -> Result<()> {
    println!("{} Generating enclave identity...", "→".cyan().bold());

    let identity = EnclaveIdentity::generate();
    let credentials = identity.credentials(&MockAttestationProvider::new())?;

    println!("{} Enclave identity created", "✓".green().bold());
    println!("  Enclave ID:      {}", identity.id().cyan());
    println!(
        "  Encryption key:  {}",
        hex::encode(&credentials.encryption_key).cyan()
    );
    println!(
        "  Signing key:     {}",
        hex::encode(&credentials.signing_key).cyan()
    );
    println!(
        "  Measurement:     {} ({})",
        credentials.attestation.measurement_hex().cyan(),
        credentials.attestation.attestation_type.to_string().yellow()
    );
    println!(
        "  Key binding:     {}",
        if credentials.is_bound() {
            "ok".green()
        } else {
            "mismatch".red()
        }
    );
    println!();
    println!("{}", serde_json::to_string_pretty(&credentials)?);

    Ok(())
}
