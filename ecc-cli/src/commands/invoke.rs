//! Invoke command handler

use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use ecc_client::{ClientSession, VerifiedResponse};
use ecc_enclave::mock::{AssetChaincode, MemoryShim};
use ecc_enclave::{ChaincodeEnclave, EnclaveIdentity};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub struct InvokeOptions {
    pub args: Vec<String>,
    pub proposal: String,
    pub capacity: usize,
    pub parallel: usize,
    pub balances: Vec<(String, u64)>,
}

struct CallReport {
    index: usize,
    request_size: usize,
    response_size: usize,
    response: VerifiedResponse,
}

pub async fn handle(options: InvokeOptions, config: &Config) -> Result<()> {
    let identity = Arc::new(EnclaveIdentity::generate());
    let enclave = Arc::new(ChaincodeEnclave::new(
        identity.clone(),
        AssetChaincode::new(),
        config.enclave.clone(),
    )?);

    let shim = Arc::new(MemoryShim::new());
    for (account, amount) in &options.balances {
        shim.insert(AssetChaincode::balance_key(account), amount.to_string().into_bytes());
    }

    let proposal = Arc::new(ClientSession::signed_proposal(options.proposal.as_bytes(), &[])?);
    let args = Arc::new(options.args);
    let parallel = options.parallel.max(1);

    println!("{} Invoking {}", "→".cyan().bold(), args.join(" ").cyan());
    println!("  Enclave ID:  {}", identity.id().cyan());
    println!("  Capacity:    {}", options.capacity.to_string().cyan());
    if parallel > 1 {
        println!("  Parallel:    {}", parallel.to_string().cyan());
    }

    let started = Instant::now();
    let mut handles = Vec::with_capacity(parallel);
    for index in 0..parallel {
        let identity = identity.clone();
        let enclave = enclave.clone();
        let shim = shim.clone();
        let proposal = proposal.clone();
        let args = args.clone();
        let capacity = options.capacity;

        handles.push(tokio::task::spawn_blocking(move || -> Result<CallReport> {
            let session = ClientSession::new(identity.public_encryption_key());
            let request = session.build_request(args.iter())?;

            let mut output = vec![0u8; capacity];
            let outcome = enclave.invoke(&proposal, &request, &mut output, shim.as_ref());
            if !outcome.is_success() {
                return Err(anyhow!(
                    "enclave returned status {} (see logs for the cause)",
                    outcome.status.code()
                ));
            }

            let response = session.validate_response(
                &output[..outcome.bytes_written],
                &identity.public_signing_key(),
                &request,
            )?;

            Ok(CallReport {
                index,
                request_size: request.len(),
                response_size: outcome.bytes_written,
                response,
            })
        }));
    }

    let mut failures = 0usize;
    for handle in handles {
        match handle.await.context("invocation task panicked")? {
            Ok(report) => print_report(&report),
            Err(e) => {
                failures += 1;
                println!("{} {}", "✗".red().bold(), e.to_string().red());
            }
        }
    }

    info!(
        invocations = parallel,
        failures,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Invocations finished"
    );

    if failures > 0 {
        return Err(anyhow!("{failures} of {parallel} invocations failed"));
    }
    Ok(())
}

fn print_report(report: &CallReport) {
    let response = &report.response;
    let status = if response.is_ok() {
        format!("{}", response.status).green()
    } else {
        format!("{}", response.status).yellow()
    };

    println!(
        "{} [{}] Signed response verified",
        "✓".green().bold(),
        report.index
    );
    println!("  Status:      {}", status);
    println!(
        "  Sizes:       request {} / response {} bytes",
        report.request_size, report.response_size
    );
    println!(
        "  Output:      {}",
        String::from_utf8_lossy(&response.output).cyan()
    );

    let rwset = &response.read_write_set;
    for (read, hash) in rwset.reads().iter().zip(&rwset.read_value_hashes) {
        println!(
            "  Read:        {} {}",
            printable_key(&read.key),
            hex::encode(hash).dimmed()
        );
    }
    for write in rwset.writes() {
        if write.is_delete {
            println!("  Delete:      {}", printable_key(&write.key));
        } else {
            println!(
                "  Write:       {} = {}",
                printable_key(&write.key),
                String::from_utf8_lossy(&write.value)
            );
        }
    }
}

/// Composite keys use NUL separators; show them as `/`.
fn printable_key(key: &str) -> String {
    key.trim_matches('\u{0}').replace('\u{0}', "/")
}
