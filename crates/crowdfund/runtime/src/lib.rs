//! Crowdfund Runtime
//!
//! The funding ledger state machine and the collaborators it runs against.
//!
//! # Overview
//!
//! A [`FundingLedger`] holds contributions for one campaign until its
//! deadline. [`FundingLedger::resolve`] then either forwards the pooled value
//! to the campaign's [`FundSink`] (threshold met) or opens withdrawals, after
//! which each contributor reclaims exactly what they put in.
//!
//! The ledger never reads the wall clock or moves value on its own; it goes
//! through three seams:
//!
//! - [`Clock`]: current time ([`SystemClock`], [`ManualClock`])
//! - [`FundSink`]: the recipient of a successful campaign ([`FundingRecipient`])
//! - [`ValueTransfer`]: outbound payments for withdrawals ([`InMemoryBank`])
//!
//! # Example
//!
//! ```
//! use crowdfund_runtime::{deploy, CampaignConfig, FundSink, InMemoryBank, ManualClock};
//! use crowdfund_types::{Address, Amount, CampaignState};
//!
//! let clock = ManualClock::starting_now();
//! let mut ledger = deploy(&CampaignConfig::default(), clock.clone(), InMemoryBank::new()).unwrap();
//!
//! ledger.contribute(&Address::new("alice"), Amount::ether(1)).unwrap();
//! clock.advance(30);
//!
//! assert_eq!(ledger.resolve().unwrap(), CampaignState::Succeeded);
//! assert!(ledger.sink().completed());
//! ```

#![deny(unsafe_code)]

pub mod bank;
pub mod clock;
pub mod config;
pub mod deploy;
pub mod ledger;
pub mod recipient;
pub mod traits;

pub use bank::InMemoryBank;
pub use clock::{ManualClock, SystemClock};
pub use config::{CampaignConfig, ConfigError, CrowdfundConfig, LoggingConfig};
pub use deploy::deploy;
pub use ledger::{FundingLedger, LedgerSnapshot, LedgerTotals};
pub use recipient::FundingRecipient;
pub use traits::{Clock, FundSink, ValueTransfer};
