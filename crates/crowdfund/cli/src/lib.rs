//! Crowdfund CLI - Command-line interface for a crowdfunding campaign
//!
//! This CLI lets developers drive a campaign on a local developer chain:
//! - Deploy a funding recipient and its campaign
//! - Contribute from named accounts, directly or by bare transfer
//! - Move chain time past the deadline and execute the outcome
//! - Withdraw from a failed campaign
//! - Inspect status, contribution history and wallets

use clap::{Parser, Subcommand};
use crowdfund_runtime::{CrowdfundConfig, LoggingConfig};
use crowdfund_types::Amount;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
pub mod devnet;
mod error;
pub mod output;

use commands::{campaign, chain, deploy, status};
pub use error::{CliError, CliResult};

/// Crowdfund CLI application
#[derive(Parser)]
#[command(name = "crowdfund")]
#[command(about = "Crowdfund - threshold-gated crowdfunding on a local developer chain", long_about = None)]
#[command(version)]
struct Cli {
    /// Devnet state file
    #[arg(long, env = "CROWDFUND_STATE", default_value = "crowdfund-devnet.json")]
    state: PathBuf,

    /// Configuration file path
    #[arg(short, long, env = "CROWDFUND_CONFIG")]
    config: Option<PathBuf>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Deploy a funding recipient and a campaign on a fresh devnet
    Deploy {
        /// Funding threshold in ether (overrides configuration)
        #[arg(long)]
        threshold: Option<Amount>,
        /// Seconds until the deadline (overrides configuration)
        #[arg(long)]
        duration: Option<u64>,
        /// Replace an existing devnet
        #[arg(long)]
        force: bool,
    },

    /// Contribute to the campaign
    Contribute {
        /// Account name
        #[arg(long)]
        from: String,
        /// Amount in ether
        #[arg(long, default_value = "0.5")]
        amount: Amount,
    },

    /// Send a bare transfer to the campaign address
    Send {
        /// Account name
        #[arg(long)]
        from: String,
        /// Amount in ether
        #[arg(long)]
        amount: Amount,
    },

    /// Execute the campaign outcome after the deadline
    Execute,

    /// Withdraw a contribution from a failed campaign
    Withdraw {
        /// Account name
        #[arg(long)]
        from: String,
    },

    /// Move chain time forward
    Advance {
        /// Seconds to advance
        secs: u64,
    },

    /// Show campaign status
    Status {
        /// Include this account's contribution
        #[arg(long)]
        account: Option<String>,
    },

    /// Show contribution history
    Contributions,

    /// Show account balances
    Accounts,
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    let config = CrowdfundConfig::load(cli.config.as_deref())?;
    init_tracing(cli.verbose, &config.logging);

    let state = cli.state.as_path();
    match cli.command {
        Commands::Deploy {
            threshold,
            duration,
            force,
        } => deploy::execute(state, config.campaign, threshold, duration, force, cli.output),
        Commands::Contribute { from, amount } => {
            campaign::contribute(state, &from, amount, false, cli.output)
        }
        Commands::Send { from, amount } => campaign::contribute(state, &from, amount, true, cli.output),
        Commands::Execute => campaign::execute(state, cli.output),
        Commands::Withdraw { from } => campaign::withdraw(state, &from, cli.output),
        Commands::Advance { secs } => chain::advance(state, secs, cli.output),
        Commands::Status { account } => status::show(state, account.as_deref(), cli.output),
        Commands::Contributions => status::contributions(state, cli.output),
        Commands::Accounts => chain::accounts(state, cli.output),
    }
}

/// Logs go to stderr so structured output on stdout stays parseable.
fn init_tracing(verbose: bool, logging: &LoggingConfig) {
    let filter = if verbose { "debug" } else { logging.level.as_str() };
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
    );

    let result = if logging.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if let Err(err) = result {
        eprintln!("tracing already initialized: {}", err);
    }
}
