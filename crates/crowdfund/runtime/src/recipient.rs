//! In-memory funding recipient

use crate::traits::FundSink;
use crowdfund_types::{Address, Amount, TransferError};
use serde::{Deserialize, Serialize};

/// Receives the lump sum of a successful campaign and remembers that it did
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingRecipient {
    address: Address,
    balance: Amount,
    completed: bool,
    /// Rejects every `complete` call when set
    #[serde(default)]
    refuses_funds: bool,
}

impl FundingRecipient {
    pub fn new() -> Self {
        Self::with_address(Address::generate())
    }

    pub fn with_address(address: Address) -> Self {
        Self {
            address,
            balance: Amount::zero(),
            completed: false,
            refuses_funds: false,
        }
    }

    /// A recipient that rejects completion, e.g. one with no payable entry point.
    pub fn refusing() -> Self {
        Self {
            refuses_funds: true,
            ..Self::new()
        }
    }

    pub fn set_refuses_funds(&mut self, refuses: bool) {
        self.refuses_funds = refuses;
    }

    pub fn refuses_funds(&self) -> bool {
        self.refuses_funds
    }
}

impl Default for FundingRecipient {
    fn default() -> Self {
        Self::new()
    }
}

impl FundSink for FundingRecipient {
    fn address(&self) -> &Address {
        &self.address
    }

    fn complete(&mut self, amount: Amount) -> Result<(), TransferError> {
        if self.refuses_funds {
            return Err(TransferError::SinkRejected {
                recipient: self.address.clone(),
                reason: "recipient refuses funds".to_string(),
            });
        }
        self.balance = self.balance.saturating_add(amount);
        self.completed = true;
        Ok(())
    }

    fn completed(&self) -> bool {
        self.completed
    }

    fn balance(&self) -> Amount {
        self.balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_marks_completed() {
        let mut recipient = FundingRecipient::new();
        assert!(!recipient.completed());

        recipient.complete(Amount::ether(2)).unwrap();
        assert!(recipient.completed());
        assert_eq!(recipient.balance(), Amount::ether(2));
    }

    #[test]
    fn test_refusing_recipient_receives_nothing() {
        let mut recipient = FundingRecipient::refusing();
        let err = recipient.complete(Amount::ether(1)).unwrap_err();

        assert!(matches!(err, TransferError::SinkRejected { .. }));
        assert!(!recipient.completed());
        assert_eq!(recipient.balance(), Amount::zero());
    }
}
