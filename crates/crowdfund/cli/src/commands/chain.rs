//! Devnet chain controls

use crate::devnet::Devnet;
use crate::error::CliResult;
use crate::output::{self, humanize_duration, print_info, OutputFormat};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

/// Table row for account display
#[derive(Debug, Serialize, Tabled)]
struct AccountRow {
    /// Account name
    name: String,
    /// Derived address
    address: String,
    /// Wallet balance in ether
    balance: String,
    /// Amount currently recorded in the campaign
    contributed: String,
}

/// Move chain time forward.
pub fn advance(state: &Path, secs: u64, format: OutputFormat) -> CliResult<()> {
    let devnet = Devnet::load(state)?;
    let now = devnet.advance(secs);
    devnet.save(state)?;

    let time_left = devnet.ledger().time_left();
    match format {
        OutputFormat::Table => {
            print_info(&format!(
                "Chain time is now {} (time left: {})",
                now,
                humanize_duration(time_left)
            ));
            Ok(())
        }
        _ => output::print_single(
            &serde_json::json!({
                "now": now.to_string(),
                "time_left_secs": time_left.as_secs(),
            }),
            format,
        ),
    }
}

/// List named accounts with their wallet balances.
pub fn accounts(state: &Path, format: OutputFormat) -> CliResult<()> {
    let devnet = Devnet::load(state)?;
    let ledger = devnet.ledger();

    let rows: Vec<AccountRow> = devnet
        .accounts()
        .map(|(name, address)| AccountRow {
            name: name.clone(),
            address: address.to_string(),
            balance: ledger.transfer().balance_of(address).to_ether_string(),
            contributed: ledger.balance_of(address).to_ether_string(),
        })
        .collect();

    output::print_output(rows, format)
}
