//! `ecc` - local driver for the chaincode enclave.
//!
//! Runs the full client → enclave → client round trip in one process
//! against the mock collaborators. Useful for inspecting envelopes and
//! sizing output buffers.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ecc")]
#[command(about = "Confidential chaincode enclave driver", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.ecc/config.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an enclave identity and print its public keys and mock credentials
    Identity,

    /// Invoke the sample asset chaincode through the enclave
    Invoke {
        /// Function name followed by its parameters
        #[arg(required = true, num_args = 1..)]
        args: Vec<String>,

        /// Proposal bytes echoed into the response
        #[arg(long, default_value = "proposal")]
        proposal: String,

        /// Caller output capacity in bytes
        #[arg(long, default_value_t = 64 * 1024)]
        capacity: usize,

        /// Number of concurrent invocations
        #[arg(long, default_value_t = 1)]
        parallel: usize,

        /// Seed a balance, as ACCOUNT=AMOUNT (repeatable)
        #[arg(long = "balance", value_parser = parse_balance)]
        balances: Vec<(String, u64)>,
    },
}

fn parse_balance(raw: &str) -> Result<(String, u64), String> {
    let (account, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ACCOUNT=AMOUNT, got {raw}"))?;
    let amount = amount
        .parse()
        .map_err(|_| format!("invalid amount in {raw}"))?;
    Ok((account.to_string(), amount))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Identity => commands::identity::handle(&config),
        Commands::Invoke {
            args,
            proposal,
            capacity,
            parallel,
            balances,
        } => {
            let options = commands::invoke::InvokeOptions {
                args,
                proposal,
                capacity,
                parallel,
                balances,
            };
            commands::invoke::handle(options, &config).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_balance() {
        assert_eq!(parse_balance("alice=100").unwrap(), ("alice".to_string(), 100));
        assert!(parse_balance("alice").is_err());
        assert!(parse_balance("alice=-3").is_err());
    }

    #[test]
    fn test_invoke_arguments() {
        let cli = Cli::try_parse_from([
            "ecc", "invoke", "--parallel", "4", "--balance", "alice=100", "transfer", "alice",
            "bob", "10",
        ])
        .unwrap();

        match cli.command {
            Commands::Invoke {
                args,
                parallel,
                balances,
                capacity,
                ..
            } => {
                assert_eq!(args, vec!["transfer", "alice", "bob", "10"]);
                assert_eq!(parallel, 4);
                assert_eq!(balances, vec![("alice".to_string(), 100)]);
                assert_eq!(capacity, 64 * 1024);
            }
            Commands::Identity => panic!("expected invoke"),
        }
    }

    #[test]
    fn test_invoke_requires_arguments() {
        assert!(Cli::try_parse_from(["ecc", "invoke"]).is_err());
    }
}
