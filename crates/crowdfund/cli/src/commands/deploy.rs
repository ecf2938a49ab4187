//! Campaign deployment

use crate::devnet::Devnet;
use crate::error::{CliError, CliResult};
use crate::output::{self, print_info, print_success, OutputFormat};
use crowdfund_runtime::{CampaignConfig, Clock, SystemClock};
use crowdfund_types::Amount;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct DeploySummary {
    campaign: String,
    crowdfund: String,
    recipient: String,
    threshold: String,
    deadline: String,
    state_file: String,
}

/// Deploy a recipient and campaign onto a fresh devnet at `state`.
pub fn execute(
    state: &Path,
    mut campaign: CampaignConfig,
    threshold: Option<Amount>,
    duration: Option<u64>,
    force: bool,
    format: OutputFormat,
) -> CliResult<()> {
    if state.exists() && !force {
        return Err(CliError::StateExists(state.to_path_buf()));
    }

    if let Some(threshold) = threshold {
        campaign.threshold = threshold.to_ether_string();
    }
    if let Some(duration) = duration {
        campaign.duration_secs = duration;
    }

    let devnet = Devnet::deploy(&campaign, SystemClock.now())?;
    devnet.save(state)?;

    let ledger = devnet.ledger();
    let summary = DeploySummary {
        campaign: ledger.id().to_string(),
        crowdfund: ledger.address().to_string(),
        recipient: ledger.recipient().to_string(),
        threshold: ledger.threshold().to_ether_string(),
        deadline: ledger.deadline().to_string(),
        state_file: state.display().to_string(),
    };

    match format {
        OutputFormat::Table => {
            print_success(&format!("Deployed FundingRecipient at {}", summary.recipient));
            print_success(&format!("Deployed CrowdFund at {}", summary.crowdfund));
            print_info(&format!(
                "Threshold {} ETH, deadline {}",
                summary.threshold, summary.deadline
            ));
            Ok(())
        }
        _ => output::print_single(&summary, format),
    }
}
