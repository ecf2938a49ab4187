//! In-memory wallet balances
//!
//! Stands in for the chain's account balances: contributors pay out of their
//! wallet and withdrawals land back in it.

use crate::traits::ValueTransfer;
use crowdfund_types::{Address, Amount, TransferError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Wallet balances keyed by address
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryBank {
    wallets: BTreeMap<Address, Amount>,
    /// Addresses that refuse inbound value
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    refusing: BTreeSet<Address>,
}

impl InMemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a wallet out of thin air (genesis allocation, faucet).
    pub fn fund(&mut self, address: &Address, amount: Amount) {
        let wallet = self.wallets.entry(address.clone()).or_default();
        *wallet = wallet.saturating_add(amount);
    }

    /// Take value out of a wallet, e.g. to pay a contribution.
    pub fn debit(&mut self, address: &Address, amount: Amount) -> Result<(), TransferError> {
        let available = self.balance_of(address);
        let remaining = available
            .checked_sub(amount)
            .ok_or_else(|| TransferError::InsufficientFunds {
                from: address.clone(),
                required: amount,
                available,
            })?;
        self.wallets.insert(address.clone(), remaining);
        Ok(())
    }

    pub fn balance_of(&self, address: &Address) -> Amount {
        self.wallets.get(address).copied().unwrap_or_default()
    }

    pub fn refuse_inbound(&mut self, address: &Address) {
        self.refusing.insert(address.clone());
    }

    pub fn accept_inbound(&mut self, address: &Address) {
        self.refusing.remove(address);
    }

    pub fn refuses(&self, address: &Address) -> bool {
        self.refusing.contains(address)
    }

    pub fn wallets(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.wallets.iter()
    }

    pub fn total(&self) -> Amount {
        self.wallets
            .values()
            .fold(Amount::zero(), |acc, amount| acc.saturating_add(*amount))
    }
}

impl ValueTransfer for InMemoryBank {
    fn send(&mut self, to: &Address, amount: Amount) -> Result<(), TransferError> {
        if self.refuses(to) {
            debug!(to = %to, amount = %amount, "Inbound value refused");
            return Err(TransferError::Refused { to: to.clone() });
        }
        self.fund(to, amount);
        Ok(())
    }
}
