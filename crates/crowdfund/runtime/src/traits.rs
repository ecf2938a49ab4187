//! Collaborator seams
//!
//! The ledger never reads global time or moves value on its own. Everything
//! outside the ledger's books comes in through these traits, injected at
//! construction.

use crowdfund_types::{Address, Amount, Timestamp, TransferError};

/// Source of the current time for deadline comparisons.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// The recipient funded in one lump sum when a campaign succeeds.
pub trait FundSink {
    /// Identity the ledger reports as its recipient.
    fn address(&self) -> &Address;

    /// Accept the whole custodied value. On error nothing was received.
    fn complete(&mut self, amount: Amount) -> Result<(), TransferError>;

    /// Whether `complete` has ever succeeded.
    fn completed(&self) -> bool;

    /// Value received so far.
    fn balance(&self) -> Amount;
}

/// Moves value out of the ledger's custody to an address.
///
/// A recipient may refuse inbound value, in which case nothing moves.
pub trait ValueTransfer {
    fn send(&mut self, to: &Address, amount: Amount) -> Result<(), TransferError>;
}
