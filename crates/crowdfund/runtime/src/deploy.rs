//! Deployment of a recipient and its campaign ledger

use crate::config::{CampaignConfig, ConfigError};
use crate::ledger::FundingLedger;
use crate::recipient::FundingRecipient;
use crate::traits::{Clock, FundSink, ValueTransfer};
use tracing::info;

/// Deploy a fresh `FundingRecipient`, then a ledger that funds it.
///
/// The deadline is `clock.now() + duration_secs` at the time of the call.
pub fn deploy<C: Clock, T: ValueTransfer>(
    config: &CampaignConfig,
    clock: C,
    transfer: T,
) -> Result<FundingLedger<C, FundingRecipient, T>, ConfigError> {
    config.validate()?;
    let threshold = config.threshold_amount()?;
    let deadline = config.deadline_from(clock.now());

    let mut recipient = FundingRecipient::new();
    recipient.set_refuses_funds(config.recipient_refuses_funds);
    info!(address = %recipient.address(), "Deployed FundingRecipient");

    let ledger = FundingLedger::new(threshold, deadline, clock, recipient, transfer)
        .with_policy(config.contribution_policy);
    info!(
        campaign = %ledger.id(),
        address = %ledger.address(),
        recipient = %ledger.recipient(),
        threshold = %threshold,
        deadline = %deadline,
        "Deployed CrowdFund"
    );

    Ok(ledger)
}
