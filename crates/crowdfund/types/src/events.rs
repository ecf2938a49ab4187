//! Ledger events
//!
//! Observers (an event-history view, an audit trail) read what the ledger
//! did from an append-only log. `Contribution` is the event external
//! observers rely on; the others record fund movements and the outcome.

use crate::{Address, Amount, Timestamp};
use serde::{Deserialize, Serialize};

/// Value received from a contributor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub contributor: Address,
    pub amount: Amount,
}

/// Something the ledger did
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
    Contribution(Contribution),
    /// A contributor reclaimed their balance
    Withdrawal { contributor: Address, amount: Amount },
    /// Custody was forwarded to the recipient on success
    FundsForwarded { recipient: Address, amount: Amount },
    /// The threshold was missed and withdrawals opened
    WithdrawalsOpened { total: Amount, threshold: Amount },
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::Contribution(_) => "Contribution",
            LedgerEvent::Withdrawal { .. } => "Withdrawal",
            LedgerEvent::FundsForwarded { .. } => "FundsForwarded",
            LedgerEvent::WithdrawalsOpened { .. } => "WithdrawalsOpened",
        }
    }
}

/// An event with its position in the log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Strictly increasing, starting at zero
    pub sequence: u64,
    /// Ledger clock reading when the event was recorded
    pub at: Timestamp,
    pub event: LedgerEvent,
}

/// Append-only event log
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, at: Timestamp, event: LedgerEvent) -> &EventRecord {
        let sequence = self.records.len() as u64;
        self.records.push(EventRecord {
            sequence,
            at,
            event,
        });
        &self.records[self.records.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&EventRecord> {
        self.records.last()
    }

    /// Records at or after `sequence`, for observers that poll.
    pub fn since(&self, sequence: u64) -> &[EventRecord] {
        let start = usize::try_from(sequence)
            .unwrap_or(usize::MAX)
            .min(self.records.len());
        &self.records[start..]
    }

    /// All contributions, oldest first.
    pub fn contributions(&self) -> impl Iterator<Item = (&EventRecord, &Contribution)> {
        self.records.iter().filter_map(|record| match &record.event {
            LedgerEvent::Contribution(contribution) => Some((record, contribution)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(who: &str, wei: u128) -> LedgerEvent {
        LedgerEvent::Contribution(Contribution {
            contributor: Address::new(who),
            amount: Amount::new(wei),
        })
    }

    #[test]
    fn test_sequence_numbers_increase() {
        let mut log = EventLog::new();
        log.record(Timestamp::from_secs(1), contribution("alice", 10));
        log.record(
            Timestamp::from_secs(2),
            LedgerEvent::Withdrawal {
                contributor: Address::new("alice"),
                amount: Amount::new(10),
            },
        );
        let sequences: Vec<u64> = log.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![0, 1]);
        assert_eq!(log.since(1).len(), 1);
        assert!(log.since(10).is_empty());
    }

    #[test]
    fn test_contributions_filter() {
        let mut log = EventLog::new();
        log.record(Timestamp::from_secs(1), contribution("alice", 10));
        log.record(
            Timestamp::from_secs(2),
            LedgerEvent::WithdrawalsOpened {
                total: Amount::new(10),
                threshold: Amount::new(100),
            },
        );
        log.record(Timestamp::from_secs(3), contribution("bob", 20));

        let contributors: Vec<&str> = log
            .contributions()
            .map(|(_, c)| c.contributor.as_str())
            .collect();
        assert_eq!(contributors, vec!["alice", "bob"]);
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let json = serde_json::to_value(contribution("alice", 5)).unwrap();
        assert_eq!(json["kind"], "contribution");
        assert_eq!(json["contributor"], "alice");
        assert_eq!(json["amount"], "5");
    }
}
