//! Local developer chain persisted between CLI invocations
//!
//! A devnet is one deployed campaign plus everything around it: a manual
//! clock that only moves on `advance`, named wallets, and the funding
//! recipient. The whole thing round-trips through a JSON state file.

use crate::error::{CliError, CliResult};
use crowdfund_runtime::{
    CampaignConfig, Clock, FundingLedger, FundingRecipient, InMemoryBank, LedgerSnapshot,
    ManualClock,
};
use crowdfund_types::{Address, Amount, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// The ledger as the devnet runs it
pub type DevLedger = FundingLedger<ManualClock, FundingRecipient, InMemoryBank>;

/// Ether credited to a named account the first time it is used.
pub const ACCOUNT_ALLOWANCE_ETHER: u64 = 10_000;

const MAX_NAME_BYTES: usize = 20;

/// On-disk form of a devnet
#[derive(Serialize, Deserialize)]
struct DevnetFile {
    now: Timestamp,
    accounts: BTreeMap<String, Address>,
    bank: InMemoryBank,
    recipient: FundingRecipient,
    ledger: LedgerSnapshot,
}

pub struct Devnet {
    clock: ManualClock,
    accounts: BTreeMap<String, Address>,
    ledger: DevLedger,
}

impl Devnet {
    /// Start a chain at `start` and deploy a campaign on it.
    pub fn deploy(config: &CampaignConfig, start: Timestamp) -> CliResult<Self> {
        let clock = ManualClock::new(start);
        let ledger = crowdfund_runtime::deploy(config, clock.clone(), InMemoryBank::new())?;
        Ok(Self {
            clock,
            accounts: BTreeMap::new(),
            ledger,
        })
    }

    pub fn load(path: &Path) -> CliResult<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(CliError::NoDeployment(path.to_path_buf()));
            }
            Err(err) => return Err(err.into()),
        };
        let file: DevnetFile = serde_json::from_str(&raw)?;

        let clock = ManualClock::new(file.now);
        let ledger = FundingLedger::restore(file.ledger, clock.clone(), file.recipient, file.bank);
        debug!(path = %path.display(), now = %file.now, "Loaded devnet");

        Ok(Self {
            clock,
            accounts: file.accounts,
            ledger,
        })
    }

    pub fn save(&self, path: &Path) -> CliResult<()> {
        let file = DevnetFile {
            now: self.clock.now(),
            accounts: self.accounts.clone(),
            bank: self.ledger.transfer().clone(),
            recipient: self.ledger.sink().clone(),
            ledger: self.ledger.snapshot(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        debug!(path = %path.display(), "Saved devnet");
        Ok(())
    }

    /// Address of a named account, funding it on first use.
    pub fn account(&mut self, name: &str) -> CliResult<Address> {
        if let Some(address) = self.accounts.get(name) {
            return Ok(address.clone());
        }

        let address = named_address(name)?;
        self.ledger
            .transfer_mut()
            .fund(&address, Amount::ether(ACCOUNT_ALLOWANCE_ETHER));
        self.accounts.insert(name.to_string(), address.clone());
        info!(account = name, address = %address, "Funded new account");
        Ok(address)
    }

    /// Address of a named account without registering it.
    pub fn address_of(&self, name: &str) -> CliResult<Address> {
        match self.accounts.get(name) {
            Some(address) => Ok(address.clone()),
            None => named_address(name),
        }
    }

    pub fn name_of(&self, address: &Address) -> Option<&str> {
        self.accounts
            .iter()
            .find(|(_, known)| *known == address)
            .map(|(name, _)| name.as_str())
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&String, &Address)> {
        self.accounts.iter()
    }

    /// Pay `amount` from a named wallet into the campaign.
    ///
    /// `direct` models a bare transfer to the ledger's address instead of a
    /// `contribute` call. The wallet is re-credited if the ledger rejects it.
    pub fn contribute(&mut self, name: &str, amount: Amount, direct: bool) -> CliResult<Address> {
        let address = self.account(name)?;
        self.ledger.transfer_mut().debit(&address, amount)?;

        let result = if direct {
            self.ledger.receive_direct(&address, amount)
        } else {
            self.ledger.contribute(&address, amount)
        };
        if let Err(err) = result {
            self.ledger.transfer_mut().fund(&address, amount);
            return Err(err.into());
        }
        Ok(address)
    }

    /// Move chain time forward, returning the new time.
    pub fn advance(&self, secs: u64) -> Timestamp {
        let now = self.clock.advance(secs);
        info!(secs, now = %now, "Advanced chain time");
        now
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn ledger(&self) -> &DevLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut DevLedger {
        &mut self.ledger
    }
}

/// Deterministic address for an account name: its bytes, zero-padded to 20.
fn named_address(name: &str) -> CliResult<Address> {
    let bytes = name.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_NAME_BYTES {
        return Err(CliError::InvalidArgument(format!(
            "account name must be 1 to {} bytes: {:?}",
            MAX_NAME_BYTES, name
        )));
    }

    let hex: String = bytes
        .iter()
        .copied()
        .chain(std::iter::repeat(0).take(MAX_NAME_BYTES - bytes.len()))
        .map(|byte| format!("{:02x}", byte))
        .collect();
    Ok(Address::new(format!("0x{}", hex)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crowdfund_runtime::FundSink;
    use crowdfund_types::{CampaignState, LedgerError};

    const START: u64 = 1_700_000_000;

    fn devnet() -> Devnet {
        Devnet::deploy(&CampaignConfig::default(), Timestamp::from_secs(START)).unwrap()
    }

    #[test]
    fn test_named_address_is_deterministic() {
        let alice = named_address("alice").unwrap();
        assert_eq!(alice, named_address("alice").unwrap());
        assert_eq!(alice.as_str(), "0x616c696365000000000000000000000000000000");
        assert!(named_address("").is_err());
        assert!(named_address("a-name-that-is-far-too-long").is_err());
    }

    #[test]
    fn test_account_is_funded_once() {
        let mut devnet = devnet();
        let alice = devnet.account("alice").unwrap();
        devnet.account("alice").unwrap();

        assert_eq!(
            devnet.ledger().transfer().balance_of(&alice),
            Amount::ether(ACCOUNT_ALLOWANCE_ETHER)
        );
        assert_eq!(devnet.name_of(&alice), Some("alice"));
    }

    #[test]
    fn test_contribute_moves_value_from_wallet() {
        let mut devnet = devnet();
        let half = Amount::from_ether("0.5").unwrap();

        let alice = devnet.contribute("alice", half, false).unwrap();
        devnet.contribute("alice", half, true).unwrap();

        assert_eq!(devnet.ledger().balance_of(&alice), Amount::ether(1));
        assert_eq!(
            devnet.ledger().transfer().balance_of(&alice),
            Amount::ether(ACCOUNT_ALLOWANCE_ETHER - 1)
        );
    }

    #[test]
    fn test_contribute_more_than_wallet_fails() {
        let mut devnet = devnet();
        let err = devnet
            .contribute("alice", Amount::ether(ACCOUNT_ALLOWANCE_ETHER + 1), false)
            .unwrap_err();
        assert!(matches!(err, CliError::Transfer(_)));
    }

    #[test]
    fn test_rejected_contribution_refunds_wallet() {
        let config = CampaignConfig {
            contribution_policy: crowdfund_types::ContributionPolicy::RejectAfterResolution,
            ..Default::default()
        };
        let mut devnet = Devnet::deploy(&config, Timestamp::from_secs(START)).unwrap();
        devnet.advance(config.duration_secs);
        devnet.ledger_mut().resolve().unwrap();

        let err = devnet.contribute("bob", Amount::ether(1), false).unwrap_err();
        assert!(matches!(
            err,
            CliError::Ledger(LedgerError::CampaignResolved { .. })
        ));
        let bob = devnet.address_of("bob").unwrap();
        assert_eq!(
            devnet.ledger().transfer().balance_of(&bob),
            Amount::ether(ACCOUNT_ALLOWANCE_ETHER)
        );
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("devnet.json");

        let mut devnet = devnet();
        devnet.contribute("alice", Amount::ether(2), false).unwrap();
        devnet.advance(45);
        devnet.save(&path).unwrap();

        let mut loaded = Devnet::load(&path).unwrap();
        assert_eq!(loaded.now(), Timestamp::from_secs(START + 45));
        let alice = loaded.address_of("alice").unwrap();
        assert_eq!(loaded.ledger().balance_of(&alice), Amount::ether(2));

        assert_eq!(
            loaded.ledger_mut().resolve().unwrap(),
            CampaignState::Succeeded
        );
        assert!(loaded.ledger().sink().completed());
    }

    #[test]
    fn test_load_missing_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            Devnet::load(&path),
            Err(CliError::NoDeployment(_))
        ));
    }
}
