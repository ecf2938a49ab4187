//! Contributor-facing campaign operations

use crate::devnet::Devnet;
use crate::error::CliResult;
use crate::output::{self, print_success, print_warning, OutputFormat};
use crowdfund_types::{Amount, CampaignState};
use std::path::Path;

/// Contribute from a named account. `direct` sends a bare transfer instead.
pub fn contribute(
    state: &Path,
    from: &str,
    amount: Amount,
    direct: bool,
    format: OutputFormat,
) -> CliResult<()> {
    let mut devnet = Devnet::load(state)?;
    let address = devnet.contribute(from, amount, direct)?;
    devnet.save(state)?;

    let balance = devnet.ledger().balance_of(&address);
    match format {
        OutputFormat::Table => {
            let how = if direct { "Sent" } else { "Contributed" };
            print_success(&format!(
                "{} {} from {} (total contribution {})",
                how, amount, from, balance
            ));
            Ok(())
        }
        _ => output::print_single(
            &serde_json::json!({
                "account": from,
                "address": address,
                "amount": amount.to_ether_string(),
                "contributed": balance.to_ether_string(),
                "direct": direct,
            }),
            format,
        ),
    }
}

/// Resolve the campaign.
pub fn execute(state: &Path, format: OutputFormat) -> CliResult<()> {
    let mut devnet = Devnet::load(state)?;
    let outcome = devnet.ledger_mut().resolve()?;
    devnet.save(state)?;

    let ledger = devnet.ledger();
    match format {
        OutputFormat::Table => {
            match outcome {
                CampaignState::Succeeded => print_success(&format!(
                    "Campaign succeeded: {} forwarded to {}",
                    ledger.totals().forwarded,
                    ledger.recipient()
                )),
                _ => print_warning(&format!(
                    "Threshold of {} not met ({} contributed): withdrawals are open",
                    ledger.threshold(),
                    ledger.total_contributed()
                )),
            }
            Ok(())
        }
        _ => output::print_single(
            &serde_json::json!({
                "state": outcome,
                "forwarded": ledger.totals().forwarded.to_ether_string(),
                "open_to_withdraw": ledger.is_open_to_withdraw(),
            }),
            format,
        ),
    }
}

/// Withdraw a named account's balance from a failed campaign.
pub fn withdraw(state: &Path, from: &str, format: OutputFormat) -> CliResult<()> {
    let mut devnet = Devnet::load(state)?;
    let address = devnet.account(from)?;
    let paid = devnet.ledger_mut().withdraw(&address)?;
    devnet.save(state)?;

    match format {
        OutputFormat::Table => {
            if paid.is_zero() {
                print_warning(&format!("Nothing to withdraw for {}", from));
            } else {
                print_success(&format!("Withdrew {} to {}", paid, from));
            }
            Ok(())
        }
        _ => output::print_single(
            &serde_json::json!({
                "account": from,
                "address": address,
                "withdrawn": paid.to_ether_string(),
            }),
            format,
        ),
    }
}
