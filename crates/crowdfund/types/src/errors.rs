//! Error types for the crowdfund ledger

use crate::{Address, Amount, CampaignState, Timestamp};

/// A value transfer that did not happen
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("Recipient {to} refuses inbound value")]
    Refused { to: Address },

    #[error("Insufficient funds in {from}: required {required}, available {available}")]
    InsufficientFunds {
        from: Address,
        required: Amount,
        available: Amount,
    },

    #[error("Funding recipient {recipient} rejected completion: {reason}")]
    SinkRejected { recipient: Address, reason: String },
}

/// Errors that can occur in ledger operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Too early: deadline {deadline} not reached (now {now})")]
    TooEarly { now: Timestamp, deadline: Timestamp },

    #[error("Not open for withdrawal (state: {state})")]
    NotOpenForWithdrawal { state: CampaignState },

    #[error("Transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    #[error("Campaign already resolved (state: {state}); contributions are closed")]
    CampaignResolved { state: CampaignState },

    #[error("Amount overflow")]
    AmountOverflow,
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
