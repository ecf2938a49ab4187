//! CLI error types

use crowdfund_runtime::ConfigError;
use crowdfund_types::{LedgerError, TransferError};
use std::path::PathBuf;
use thiserror::Error;

/// CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Ledger(#[from] LedgerError),

    #[error("{0}")]
    Transfer(#[from] TransferError),

    #[error("No deployment found at {0} (run `crowdfund deploy` first)")]
    NoDeployment(PathBuf),

    #[error("State file {0} already exists (use --force to redeploy)")]
    StateExists(PathBuf),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
