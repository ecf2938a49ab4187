//! Campaign status and contribution history

use crate::devnet::Devnet;
use crate::error::CliResult;
use crate::output::{self, humanize_duration, print_success, print_warning, OutputFormat};
use colored::Colorize;
use crowdfund_runtime::FundSink;
use crowdfund_types::CampaignState;
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

#[derive(Debug, Serialize)]
struct StatusView {
    campaign: String,
    crowdfund: String,
    recipient: String,
    state: CampaignState,
    open_to_withdraw: bool,
    now: String,
    deadline: String,
    time_left_secs: u64,
    time_left: String,
    threshold: String,
    total_contributed: String,
    custodied: String,
    recipient_completed: bool,
    recipient_balance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    account: Option<AccountView>,
}

#[derive(Debug, Serialize)]
struct AccountView {
    name: String,
    address: String,
    contributed: String,
}

/// Table row for contribution history
#[derive(Debug, Serialize, Tabled)]
struct ContributionRow {
    #[tabled(rename = "#")]
    sequence: u64,
    /// Chain time of the contribution
    time: String,
    /// Account name, or address when unknown
    contributor: String,
    /// Amount in ether
    amount: String,
}

/// Show campaign progress, optionally from one account's point of view.
pub fn show(state: &Path, account: Option<&str>, format: OutputFormat) -> CliResult<()> {
    let devnet = Devnet::load(state)?;
    let ledger = devnet.ledger();

    let account = match account {
        Some(name) => {
            let address = devnet.address_of(name)?;
            Some(AccountView {
                name: name.to_string(),
                contributed: ledger.balance_of(&address).to_ether_string(),
                address: address.to_string(),
            })
        }
        None => None,
    };

    let time_left = ledger.time_left();
    let view = StatusView {
        campaign: ledger.id().to_string(),
        crowdfund: ledger.address().to_string(),
        recipient: ledger.recipient().to_string(),
        state: ledger.state(),
        open_to_withdraw: ledger.is_open_to_withdraw(),
        now: devnet.now().to_string(),
        deadline: ledger.deadline().to_string(),
        time_left_secs: time_left.as_secs(),
        time_left: humanize_duration(time_left),
        threshold: ledger.threshold().to_ether_string(),
        total_contributed: ledger.total_contributed().to_ether_string(),
        custodied: ledger.custodied().to_ether_string(),
        recipient_completed: ledger.sink().completed(),
        recipient_balance: ledger.sink().balance().to_ether_string(),
        account,
    };

    match format {
        OutputFormat::Table => {
            print_table(&view);
            Ok(())
        }
        _ => output::print_single(&view, format),
    }
}

fn print_table(view: &StatusView) {
    println!("{} {}", "CrowdFund".bold().cyan(), view.crowdfund.dimmed());
    println!("{}", "=".repeat(60));
    println!("  {:<20} {}", "Time left:", view.time_left.bold());
    println!("  {:<20} {}", "Deadline:", view.deadline);
    println!(
        "  {:<20} {} / {} ETH",
        "Total contributed:", view.custodied, view.threshold
    );
    if let Some(account) = &view.account {
        println!(
            "  {:<20} {} ETH ({})",
            "You contributed:", account.contributed, account.name
        );
    }
    println!("  {:<20} {}", "State:", view.state);
    println!("  {:<20} {}", "Recipient:", view.recipient);
    println!();

    if view.recipient_completed {
        print_success(&format!(
            "Funding recipient completed with {} ETH",
            view.recipient_balance
        ));
    } else if view.open_to_withdraw {
        print_warning("Threshold not met: contributors can withdraw");
    }
}

/// List every recorded contribution in order.
pub fn contributions(state: &Path, format: OutputFormat) -> CliResult<()> {
    let devnet = Devnet::load(state)?;

    let rows: Vec<ContributionRow> = devnet
        .ledger()
        .contributions()
        .map(|(record, contribution)| ContributionRow {
            sequence: record.sequence,
            time: record.at.to_string(),
            contributor: devnet
                .name_of(&contribution.contributor)
                .map(str::to_string)
                .unwrap_or_else(|| contribution.contributor.short()),
            amount: contribution.amount.to_ether_string(),
        })
        .collect();

    output::print_output(rows, format)
}
